use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::AssessmentResult};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssessmentResultRepository: Send + Sync {
    async fn create(&self, result: AssessmentResult) -> AppResult<AssessmentResult>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<AssessmentResult>>;
    async fn list_by_user(
        &self,
        user_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<AssessmentResult>, i64)>;
}

pub struct MongoAssessmentResultRepository {
    collection: Collection<AssessmentResult>,
}

impl MongoAssessmentResultRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("assessment_results");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for assessment_results collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let session_index = IndexModel::builder()
            .keys(doc! { "session_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("session_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(session_index).await?;

        log::info!("Successfully created indexes for assessment_results collection");
        Ok(())
    }
}

#[async_trait]
impl AssessmentResultRepository for MongoAssessmentResultRepository {
    async fn create(&self, result: AssessmentResult) -> AppResult<AssessmentResult> {
        self.collection.insert_one(&result).await?;
        Ok(result)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<AssessmentResult>> {
        let result = self.collection.find_one(doc! { "id": id }).await?;
        Ok(result)
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<AssessmentResult>, i64)> {
        let filter = doc! { "user_id": user_id };

        let total = self.collection.count_documents(filter.clone()).await?;

        let results = self
            .collection
            .find(filter)
            .skip(offset.max(0) as u64)
            .limit(limit)
            .sort(doc! { "completed_at": -1 })
            .await?
            .try_collect()
            .await?;

        Ok((results, total as i64))
    }
}
