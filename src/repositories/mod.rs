pub mod answer_repository;
pub mod assessment_result_repository;
pub mod assessment_session_repository;
pub mod learning_progress_repository;
pub mod question_repository;

pub use answer_repository::{AnswerFilter, AnswerRepository, MongoAnswerRepository};
pub use assessment_result_repository::{
    AssessmentResultRepository, MongoAssessmentResultRepository,
};
pub use assessment_session_repository::{
    AssessmentSessionRepository, MongoAssessmentSessionRepository,
};
pub use learning_progress_repository::{
    LearningProgressRepository, MongoLearningProgressRepository,
};
pub use question_repository::{MongoQuestionRepository, QuestionRepository};
