use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::Question;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Answer {
    pub id: String,
    pub user_id: String,
    pub question_id: String,
    pub content: String,
    pub is_correct: bool,
    pub time_spent: i32, // seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub difficulty: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Answer {
    /// Records a graded submission, copying the question's subject, topic and course.
    pub fn record(
        user_id: &str,
        question: &Question,
        content: &str,
        is_correct: bool,
        time_spent: i32,
        session_id: Option<&str>,
    ) -> Self {
        Answer {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            question_id: question.id.clone(),
            content: content.to_string(),
            is_correct,
            time_spent: time_spent.max(0),
            session_id: session_id.map(str::to_string),
            difficulty: question.difficulty.representative_level(),
            subject: question.subject.clone(),
            topic: question.topic.clone(),
            course_id: question.course_id.clone(),
            created_at: Utc::now(),
        }
    }
}
