pub mod answer;
pub mod assessment_config;
pub mod assessment_result;
pub mod assessment_session;
pub mod learning_progress;
pub mod question;
pub use answer::Answer;
pub use assessment_config::{AssessmentCatalog, AssessmentConfig};
pub use assessment_result::{AssessmentResult, ProficiencyLevel, SubjectBreakdown, TopicBreakdown};
pub use assessment_session::{AssessmentSession, SessionStatus};
pub use learning_progress::{LearningProgress, ProgressStatus};
pub use question::{DifficultyBucket, Question, QuestionType};
