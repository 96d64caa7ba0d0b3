use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::Database,
    errors::AppResult,
    models::domain::{DifficultyBucket, Question},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn create(&self, question: Question) -> AppResult<Question>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>>;
    /// Newest question in `bucket` whose id is not in `exclude_ids`, ties broken by id descending.
    async fn find_latest_in_bucket(
        &self,
        bucket: DifficultyBucket,
        exclude_ids: &[String],
    ) -> AppResult<Option<Question>>;
}

pub struct MongoQuestionRepository {
    collection: Collection<Question>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("questions");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for questions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let bucket_index = IndexModel::builder()
            .keys(doc! { "difficulty": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("difficulty_created_at".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(bucket_index).await?;

        log::info!("Successfully created indexes for questions collection");
        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn create(&self, question: Question) -> AppResult<Question> {
        self.collection.insert_one(&question).await?;
        Ok(question)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        let question = self.collection.find_one(doc! { "id": id }).await?;
        Ok(question)
    }

    async fn find_latest_in_bucket(
        &self,
        bucket: DifficultyBucket,
        exclude_ids: &[String],
    ) -> AppResult<Option<Question>> {
        let question = self
            .collection
            .find_one(doc! {
                "difficulty": bucket.as_str(),
                "id": { "$nin": exclude_ids.to_vec() },
            })
            .sort(doc! { "created_at": -1, "id": -1 })
            .await?;
        Ok(question)
    }
}
