use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::LearningProgress};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LearningProgressRepository: Send + Sync {
    async fn find(&self, user_id: &str, course_id: &str) -> AppResult<Option<LearningProgress>>;
    async fn upsert(&self, progress: LearningProgress) -> AppResult<LearningProgress>;
}

pub struct MongoLearningProgressRepository {
    collection: Collection<LearningProgress>,
}

impl MongoLearningProgressRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("learning_progress");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for learning_progress collection");

        let user_course_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "course_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_course_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(user_course_index).await?;

        log::info!("Successfully created indexes for learning_progress collection");
        Ok(())
    }
}

#[async_trait]
impl LearningProgressRepository for MongoLearningProgressRepository {
    async fn find(&self, user_id: &str, course_id: &str) -> AppResult<Option<LearningProgress>> {
        let progress = self
            .collection
            .find_one(doc! { "user_id": user_id, "course_id": course_id })
            .await?;
        Ok(progress)
    }

    async fn upsert(&self, progress: LearningProgress) -> AppResult<LearningProgress> {
        self.collection
            .replace_one(
                doc! { "user_id": &progress.user_id, "course_id": &progress.course_id },
                &progress,
            )
            .upsert(true)
            .await?;
        Ok(progress)
    }
}
