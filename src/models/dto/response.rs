use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{
    Answer, AssessmentResult, AssessmentSession, Question, QuestionType, SessionStatus,
};

pub const DEFAULT_SUBJECT: &str = "General";
pub const DEFAULT_TOPIC: &str = "Basics";
pub const DEFAULT_TIME_LIMIT_SECONDS: i32 = 300;

#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
pub struct QuestionOptionView {
    pub id: String,
    pub text: String,
}

/// Learner-facing question. Never carries the correct answer.
#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
pub struct QuestionView {
    pub id: String,
    pub question_type: QuestionType,
    pub subject: String,
    pub topic: String,
    pub difficulty: i32,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<QuestionOptionView>>,
    /// Per-question limit. The assessment-wide limit comes with the start response.
    pub time_limit_seconds: i32,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        let options = if question.question_type.is_choice() && !question.options.is_empty() {
            Some(
                question
                    .options
                    .iter()
                    .enumerate()
                    .map(|(index, text)| QuestionOptionView {
                        id: index.to_string(),
                        text: text.clone(),
                    })
                    .collect(),
            )
        } else {
            None
        };

        QuestionView {
            id: question.id.clone(),
            question_type: question.question_type,
            subject: question
                .subject
                .clone()
                .unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            topic: question
                .topic
                .clone()
                .unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
            difficulty: question.difficulty.representative_level(),
            content: question.content.clone(),
            options,
            time_limit_seconds: DEFAULT_TIME_LIMIT_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct StartAssessmentResponse {
    pub session_id: String,
    pub question: QuestionView,
    /// Whole-assessment limit from the config. Enforced by the client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_seconds: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub explanation: Option<String>,
    pub new_difficulty: i32,
    pub performance_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
pub struct AdvanceResponse {
    pub is_complete: bool,
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_id: Option<String>,
}

impl AdvanceResponse {
    pub fn next_question(question: QuestionView) -> Self {
        Self {
            is_complete: false,
            question: Some(question),
            result_id: None,
        }
    }

    pub fn complete(result_id: String) -> Self {
        Self {
            is_complete: true,
            question: None,
            result_id: Some(result_id),
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct SessionView {
    pub id: String,
    pub user_id: String,
    pub config_id: String,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub current_difficulty: i32,
    pub questions_answered: i32,
    pub correct_answers: i32,
    pub current_question_id: Option<String>,
    pub last_answered_at: Option<DateTime<Utc>>,
    pub result_id: Option<String>,
}

impl From<AssessmentSession> for SessionView {
    fn from(session: AssessmentSession) -> Self {
        SessionView {
            id: session.id,
            user_id: session.user_id,
            config_id: session.config_id,
            status: session.status,
            started_at: session.started_at,
            completed_at: session.completed_at,
            current_difficulty: session.current_difficulty,
            questions_answered: session.questions_answered,
            correct_answers: session.correct_answers,
            current_question_id: session.current_question_id,
            last_answered_at: session.last_answered_at,
            result_id: session.result_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct AnswerDto {
    pub id: String,
    pub user_id: String,
    pub question_id: String,
    pub content: String,
    pub is_correct: bool,
    pub time_spent: i32,
    pub session_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Answer> for AnswerDto {
    fn from(answer: Answer) -> Self {
        AnswerDto {
            id: answer.id,
            user_id: answer.user_id,
            question_id: answer.question_id,
            content: answer.content,
            is_correct: answer.is_correct,
            time_spent: answer.time_spent,
            session_id: answer.session_id,
            created_at: answer.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub correct_answer: String,
    pub explanation: Option<String>,
    pub points_earned: i32,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct SubmitAnswerResponse {
    pub answer: AnswerDto,
    pub feedback: AnswerFeedback,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct PaginationMetadata {
    pub offset: i64,
    pub limit: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct PaginatedAnswers {
    pub items: Vec<AnswerDto>,
    pub pagination: PaginationMetadata,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct PaginatedResults {
    pub items: Vec<AssessmentResult>,
    pub pagination: PaginationMetadata,
}
