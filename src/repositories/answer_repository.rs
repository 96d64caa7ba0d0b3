use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::Answer};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerFilter {
    pub user_id: Option<String>,
    pub question_id: Option<String>,
}

impl AnswerFilter {
    fn to_document(&self) -> Document {
        let mut filter = doc! {};
        if let Some(user_id) = &self.user_id {
            filter.insert("user_id", user_id);
        }
        if let Some(question_id) = &self.question_id {
            filter.insert("question_id", question_id);
        }
        filter
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnswerRepository: Send + Sync {
    async fn create(&self, answer: Answer) -> AppResult<Answer>;
    /// Answers recorded for a session, oldest first.
    async fn find_by_session(&self, session_id: &str) -> AppResult<Vec<Answer>>;
    /// Answer given outside any assessment session.
    async fn find_standalone(&self, user_id: &str, question_id: &str)
        -> AppResult<Option<Answer>>;
    /// `(total, correct)` answers the user has given to questions of a course.
    async fn count_for_course(&self, user_id: &str, course_id: &str) -> AppResult<(i64, i64)>;
    /// Newest first.
    async fn list(
        &self,
        filter: AnswerFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Answer>, i64)>;
}

pub struct MongoAnswerRepository {
    collection: Collection<Answer>,
}

impl MongoAnswerRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("answers");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for answers collection");

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
            .keys(doc! { "session_id": 1, "created_at": 1 })
            .options(
                IndexOptions::builder()
                    .name("session_created_at".to_string())
                    .build(),
            )
            .build();

        let user_question_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "question_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("user_question".to_string())
                    .build(),
            )
            .build();

        let user_course_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "course_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("user_course".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(session_index).await?;
        self.collection.create_index(user_question_index).await?;
        self.collection.create_index(user_course_index).await?;

        log::info!("Successfully created indexes for answers collection");
        Ok(())
    }
}

#[async_trait]
impl AnswerRepository for MongoAnswerRepository {
    async fn create(&self, answer: Answer) -> AppResult<Answer> {
        self.collection.insert_one(&answer).await?;
        Ok(answer)
    }

    async fn find_by_session(&self, session_id: &str) -> AppResult<Vec<Answer>> {
        let answers = self
            .collection
            .find(doc! { "session_id": session_id })
            .sort(doc! { "created_at": 1, "id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(answers)
    }

    async fn find_standalone(
        &self,
        user_id: &str,
        question_id: &str,
    ) -> AppResult<Option<Answer>> {
        let answer = self
            .collection
            .find_one(doc! {
                "user_id": user_id,
                "question_id": question_id,
                "session_id": null,
            })
            .await?;
        Ok(answer)
    }

    async fn count_for_course(&self, user_id: &str, course_id: &str) -> AppResult<(i64, i64)> {
        let total = self
            .collection
            .count_documents(doc! { "user_id": user_id, "course_id": course_id })
            .await?;
        let correct = self
            .collection
            .count_documents(doc! {
                "user_id": user_id,
                "course_id": course_id,
                "is_correct": true,
            })
            .await?;
        Ok((total as i64, correct as i64))
    }

    async fn list(
        &self,
        filter: AnswerFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Answer>, i64)> {
        let filter = filter.to_document();

        let total = self.collection.count_documents(filter.clone()).await?;

        let answers = self
            .collection
            .find(filter)
            .skip(offset.max(0) as u64)
            .limit(limit)
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;

        Ok((answers, total as i64))
    }
}
