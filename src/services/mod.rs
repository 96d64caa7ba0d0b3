pub mod answer_service;
pub mod assessment_service;
pub mod difficulty;
pub mod question_bank;
pub mod result_synthesizer;
pub mod termination;

pub use answer_service::AnswerService;
pub use assessment_service::AssessmentService;
pub use difficulty::DifficultyController;
pub use question_bank::QuestionBank;
pub use result_synthesizer::{AnsweredItem, ResultSynthesizer};
pub use termination::TerminationPolicy;
