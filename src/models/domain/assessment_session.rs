use async_graphql::Enum;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::AssessmentConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "IN_PROGRESS",
            SessionStatus::Completed => "COMPLETED",
            SessionStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AssessmentSession {
    pub id: String,
    pub user_id: String,
    pub config_id: String,
    pub status: SessionStatus,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub current_difficulty: i32,
    pub questions_answered: i32,
    pub correct_answers: i32,
    /// Question awaiting an answer. Cleared once it is answered.
    #[serde(default)]
    pub current_question_id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub last_answered_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_id: Option<String>,
    /// Bumped on every write; updates are conditional on it.
    pub version: i64,
}

impl AssessmentSession {
    pub fn start(user_id: &str, config: &AssessmentConfig, first_question_id: &str) -> Self {
        AssessmentSession {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            config_id: config.id.clone(),
            status: SessionStatus::InProgress,
            started_at: Utc::now(),
            completed_at: None,
            current_difficulty: config.initial_difficulty.clamp(1, 10),
            questions_answered: 0,
            correct_answers: 0,
            current_question_id: Some(first_question_id.to_string()),
            last_answered_at: None,
            result_id: None,
            version: 0,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == SessionStatus::InProgress
    }

    pub fn performance_ratio(&self) -> f64 {
        if self.questions_answered == 0 {
            return 0.0;
        }
        self.correct_answers as f64 / self.questions_answered as f64
    }

    pub fn last_activity_at(&self) -> DateTime<Utc> {
        self.last_answered_at.unwrap_or(self.started_at)
    }

    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.is_in_progress() && now - self.last_activity_at() > ttl
    }
}
