use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{DifficultyBucket, Question},
    repositories::QuestionRepository,
};

/// Read-only access to the question bank.
pub struct QuestionBank {
    repository: Arc<dyn QuestionRepository>,
}

impl QuestionBank {
    pub fn new(repository: Arc<dyn QuestionRepository>) -> Self {
        Self { repository }
    }

    /// Newest question in `bucket` not listed in `exclude_ids`.
    /// `None` means the bucket is exhausted for this caller.
    pub async fn fetch_next(
        &self,
        bucket: DifficultyBucket,
        exclude_ids: &[String],
    ) -> AppResult<Option<Question>> {
        self.repository
            .find_latest_in_bucket(bucket, exclude_ids)
            .await
    }

    pub async fn get(&self, question_id: &str) -> AppResult<Question> {
        self.repository
            .find_by_id(question_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question '{}' not found", question_id)))
    }
}
