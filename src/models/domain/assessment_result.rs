use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "lowercase")]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ProficiencyLevel {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            ProficiencyLevel::Advanced
        } else if percentage >= 60.0 {
            ProficiencyLevel::Intermediate
        } else {
            ProficiencyLevel::Beginner
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct TopicBreakdown {
    pub topic: String,
    pub score: i32,
    pub max_score: i32,
    pub percentage: f64,
    pub questions_answered: i32,
    pub correct_answers: i32,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct SubjectBreakdown {
    pub subject: String,
    pub score: i32,
    pub max_score: i32,
    pub percentage: f64,
    pub level: ProficiencyLevel,
    pub topics: Vec<TopicBreakdown>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, SimpleObject)]
pub struct AssessmentResult {
    pub id: String,
    pub user_id: String,
    pub session_id: String,
    pub overall_score: i32,
    pub overall_percentage: f64,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub time_spent: i64,
    pub subjects: Vec<SubjectBreakdown>,
    pub recommendations: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub next_steps: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

/// `100 * score / max_score`, 0 when nothing was scored.
pub fn percentage(score: i32, max_score: i32) -> f64 {
    if max_score == 0 {
        return 0.0;
    }
    100.0 * score as f64 / max_score as f64
}
