use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{AssessmentSession, SessionStatus},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssessmentSessionRepository: Send + Sync {
    async fn create(&self, session: AssessmentSession) -> AppResult<AssessmentSession>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<AssessmentSession>>;
    async fn find_latest_in_progress(&self, user_id: &str) -> AppResult<Option<AssessmentSession>>;
    async fn find_in_progress_by_user(&self, user_id: &str) -> AppResult<Vec<AssessmentSession>>;
    /// In-progress sessions whose last activity happened before `cutoff`.
    async fn find_stale_in_progress(
        &self,
        cutoff: DateTime<Utc>,
    ) -> AppResult<Vec<AssessmentSession>>;
    /// Replaces the stored session only if its version still equals `session.version`.
    /// Returns the stored copy carrying the bumped version, or `Conflict`.
    async fn update(&self, session: AssessmentSession) -> AppResult<AssessmentSession>;
}

pub struct MongoAssessmentSessionRepository {
    collection: Collection<AssessmentSession>,
}

impl MongoAssessmentSessionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("assessment_sessions");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for assessment_sessions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let user_status_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "status": 1, "started_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_status_started_at".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(user_status_index).await?;

        log::info!("Successfully created indexes for assessment_sessions collection");
        Ok(())
    }
}

#[async_trait]
impl AssessmentSessionRepository for MongoAssessmentSessionRepository {
    async fn create(&self, session: AssessmentSession) -> AppResult<AssessmentSession> {
        self.collection.insert_one(&session).await?;
        Ok(session)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<AssessmentSession>> {
        let session = self.collection.find_one(doc! { "id": id }).await?;
        Ok(session)
    }

    async fn find_latest_in_progress(&self, user_id: &str) -> AppResult<Option<AssessmentSession>> {
        let session = self
            .collection
            .find_one(doc! {
                "user_id": user_id,
                "status": SessionStatus::InProgress.as_str(),
            })
            .sort(doc! { "started_at": -1 })
            .await?;
        Ok(session)
    }

    async fn find_in_progress_by_user(&self, user_id: &str) -> AppResult<Vec<AssessmentSession>> {
        let sessions = self
            .collection
            .find(doc! {
                "user_id": user_id,
                "status": SessionStatus::InProgress.as_str(),
            })
            .await?
            .try_collect()
            .await?;
        Ok(sessions)
    }

    async fn find_stale_in_progress(
        &self,
        cutoff: DateTime<Utc>,
    ) -> AppResult<Vec<AssessmentSession>> {
        let cutoff_ms = cutoff.timestamp_millis();
        let sessions = self
            .collection
            .find(doc! {
                "status": SessionStatus::InProgress.as_str(),
                "$or": [
                    { "last_answered_at": { "$lt": cutoff_ms } },
                    { "last_answered_at": null, "started_at": { "$lt": cutoff_ms } },
                ],
            })
            .await?
            .try_collect()
            .await?;
        Ok(sessions)
    }

    async fn update(&self, session: AssessmentSession) -> AppResult<AssessmentSession> {
        let expected_version = session.version;
        let mut next = session;
        next.version = expected_version + 1;

        let result = self
            .collection
            .replace_one(doc! { "id": &next.id, "version": expected_version }, &next)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::Conflict(format!(
                "Assessment session '{}' was modified concurrently",
                next.id
            )));
        }

        Ok(next)
    }
}
