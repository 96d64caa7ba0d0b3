use async_graphql::Enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coarse difficulty stored on questions. Sessions track a finer 1-10 level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Enum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DifficultyBucket {
    Easy,
    Medium,
    Hard,
}

impl DifficultyBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyBucket::Easy => "EASY",
            DifficultyBucket::Medium => "MEDIUM",
            DifficultyBucket::Hard => "HARD",
        }
    }

    /// Representative 1-10 level shown to clients.
    pub fn representative_level(&self) -> i32 {
        match self {
            DifficultyBucket::Easy => 3,
            DifficultyBucket::Medium => 6,
            DifficultyBucket::Hard => 9,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    MultipleChoice,
    ShortAnswer,
    TrueFalse,
    Essay,
    FillBlank,
}

impl QuestionType {
    pub fn is_choice(&self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::TrueFalse)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub content: String,
    pub question_type: QuestionType,
    pub difficulty: DifficultyBucket,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub points: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn new(
        content: &str,
        question_type: QuestionType,
        difficulty: DifficultyBucket,
        correct_answer: &str,
    ) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            content: content.to_string(),
            question_type,
            difficulty,
            options: Vec::new(),
            correct_answer: correct_answer.to_string(),
            explanation: None,
            points: 1,
            subject: None,
            topic: None,
            course_id: None,
            created_at: Utc::now(),
        }
    }

    /// Option text a submission refers to. Choice questions accept the option
    /// text itself or the option id (its index). A literal option text wins, so
    /// numeral options are never shifted by an index lookup. Anything else is
    /// taken as literal answer text.
    pub fn resolve_submission<'a>(&'a self, submitted: &'a str) -> &'a str {
        if self.question_type.is_choice() {
            let wanted = normalize(submitted);
            if let Some(option) = self.options.iter().find(|o| normalize(o) == wanted) {
                return option.as_str();
            }
            if let Some(option) = submitted
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|index| self.options.get(index))
            {
                return option.as_str();
            }
        }
        submitted
    }

    pub fn is_correct(&self, submitted: &str) -> bool {
        normalize(self.resolve_submission(submitted)) == normalize(&self.correct_answer)
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
