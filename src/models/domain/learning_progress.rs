use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// Per-course aggregate of a learner's answers.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct LearningProgress {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub status: ProgressStatus,
    pub time_spent: i64,
    pub score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LearningProgress {
    pub fn first_answer(user_id: &str, course_id: &str, is_correct: bool, time_spent: i32) -> Self {
        let now = Utc::now();
        LearningProgress {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            status: ProgressStatus::InProgress,
            time_spent: time_spent.max(0) as i64,
            score: if is_correct { 100.0 } else { 0.0 },
            created_at: now,
            updated_at: now,
        }
    }
}
