use async_graphql::InputObject;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct StartAssessmentRequest {
    #[validate(length(min = 1, max = 100))]
    pub user_id: String,

    #[validate(length(min = 1, max = 100))]
    pub config_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct SubmitAssessmentAnswerRequest {
    #[validate(length(min = 1, max = 100))]
    pub user_id: String,

    #[validate(length(min = 1, max = 100))]
    pub question_id: String,

    #[validate(length(min = 1, max = 10000))]
    pub answer: String,

    #[validate(range(min = 0))]
    pub time_spent: Option<i32>, // seconds
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct AdvanceAssessmentRequest {
    #[validate(length(min = 1, max = 100))]
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct CompleteAssessmentRequest {
    #[validate(length(min = 1, max = 100))]
    pub user_id: String,

    /// Total seconds reported by the client. Falls back to the sum of answer times.
    #[validate(range(min = 0))]
    pub time_spent: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1, max = 100))]
    pub question_id: String,

    #[validate(length(min = 1, max = 10000))]
    pub answer: String,

    #[validate(range(min = 0))]
    pub time_spent: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, InputObject)]
pub struct AnswerQueryParams {
    pub user_id: Option<String>,
    pub question_id: Option<String>,

    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl AnswerQueryParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).min(100)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct PaginationParams {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: Some(0),
            limit: Some(20),
        }
    }
}

impl PaginationParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).min(100)
    }
}
