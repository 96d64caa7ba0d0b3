#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use adaptive_assessment_server::{
    app_state::{AppState, Repositories},
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{
        Answer, AssessmentCatalog, AssessmentResult, AssessmentSession, DifficultyBucket,
        LearningProgress, Question, QuestionType, SessionStatus,
    },
    repositories::{
        AnswerFilter, AnswerRepository, AssessmentResultRepository, AssessmentSessionRepository,
        LearningProgressRepository, QuestionRepository,
    },
};

#[derive(Default)]
pub struct InMemoryQuestionRepository {
    questions: RwLock<HashMap<String, Question>>,
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn create(&self, question: Question) -> AppResult<Question> {
        let mut questions = self.questions.write().await;
        if questions.contains_key(&question.id) {
            return Err(AppError::AlreadyExists(question.id.clone()));
        }
        questions.insert(question.id.clone(), question.clone());
        Ok(question)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        Ok(self.questions.read().await.get(id).cloned())
    }

    async fn find_latest_in_bucket(
        &self,
        bucket: DifficultyBucket,
        exclude_ids: &[String],
    ) -> AppResult<Option<Question>> {
        let questions = self.questions.read().await;
        Ok(questions
            .values()
            .filter(|q| q.difficulty == bucket && !exclude_ids.contains(&q.id))
            .max_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)))
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<String, AssessmentSession>>,
}

impl InMemorySessionRepository {
    /// Overwrites a stored session without a version check.
    pub async fn put(&self, session: AssessmentSession) {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session);
    }
}

#[async_trait]
impl AssessmentSessionRepository for InMemorySessionRepository {
    async fn create(&self, session: AssessmentSession) -> AppResult<AssessmentSession> {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<AssessmentSession>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn find_latest_in_progress(&self, user_id: &str) -> AppResult<Option<AssessmentSession>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .filter(|s| s.user_id == user_id && s.status == SessionStatus::InProgress)
            .max_by_key(|s| s.started_at)
            .cloned())
    }

    async fn find_in_progress_by_user(&self, user_id: &str) -> AppResult<Vec<AssessmentSession>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .filter(|s| s.user_id == user_id && s.status == SessionStatus::InProgress)
            .cloned()
            .collect())
    }

    async fn find_stale_in_progress(
        &self,
        cutoff: DateTime<Utc>,
    ) -> AppResult<Vec<AssessmentSession>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .filter(|s| s.status == SessionStatus::InProgress && s.last_activity_at() < cutoff)
            .cloned()
            .collect())
    }

    async fn update(&self, session: AssessmentSession) -> AppResult<AssessmentSession> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(&session.id) {
            Some(stored) if stored.version == session.version => {
                let mut next = session;
                next.version += 1;
                sessions.insert(next.id.clone(), next.clone());
                Ok(next)
            }
            _ => Err(AppError::Conflict(format!(
                "Assessment session '{}' was modified concurrently",
                session.id
            ))),
        }
    }
}

#[derive(Default)]
pub struct InMemoryAnswerRepository {
    answers: RwLock<Vec<Answer>>,
}

#[async_trait]
impl AnswerRepository for InMemoryAnswerRepository {
    async fn create(&self, answer: Answer) -> AppResult<Answer> {
        self.answers.write().await.push(answer.clone());
        Ok(answer)
    }

    async fn find_by_session(&self, session_id: &str) -> AppResult<Vec<Answer>> {
        let answers = self.answers.read().await;
        Ok(answers
            .iter()
            .filter(|a| a.session_id.as_deref() == Some(session_id))
            .cloned()
            .collect())
    }

    async fn find_standalone(
        &self,
        user_id: &str,
        question_id: &str,
    ) -> AppResult<Option<Answer>> {
        let answers = self.answers.read().await;
        Ok(answers
            .iter()
            .find(|a| {
                a.user_id == user_id && a.question_id == question_id && a.session_id.is_none()
            })
            .cloned())
    }

    async fn count_for_course(&self, user_id: &str, course_id: &str) -> AppResult<(i64, i64)> {
        let answers = self.answers.read().await;
        let in_course: Vec<_> = answers
            .iter()
            .filter(|a| a.user_id == user_id && a.course_id.as_deref() == Some(course_id))
            .collect();
        let correct = in_course.iter().filter(|a| a.is_correct).count();
        Ok((in_course.len() as i64, correct as i64))
    }

    async fn list(
        &self,
        filter: AnswerFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Answer>, i64)> {
        let answers = self.answers.read().await;
        let mut items: Vec<_> = answers
            .iter()
            .filter(|a| filter.user_id.as_ref().map_or(true, |u| &a.user_id == u))
            .filter(|a| filter.question_id.as_ref().map_or(true, |q| &a.question_id == q))
            .cloned()
            .collect();
        items.reverse();

        let total = items.len() as i64;
        let page = items
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }
}

#[derive(Default)]
pub struct InMemoryResultRepository {
    results: RwLock<HashMap<String, AssessmentResult>>,
}

#[async_trait]
impl AssessmentResultRepository for InMemoryResultRepository {
    async fn create(&self, result: AssessmentResult) -> AppResult<AssessmentResult> {
        let mut results = self.results.write().await;
        if results.values().any(|r| r.session_id == result.session_id) {
            return Err(AppError::AlreadyExists(format!(
                "Result for session {}",
                result.session_id
            )));
        }
        results.insert(result.id.clone(), result.clone());
        Ok(result)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<AssessmentResult>> {
        Ok(self.results.read().await.get(id).cloned())
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<AssessmentResult>, i64)> {
        let results = self.results.read().await;
        let mut items: Vec<_> = results
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

        let total = items.len() as i64;
        let page = items
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }
}

#[derive(Default)]
pub struct InMemoryProgressRepository {
    progress: RwLock<HashMap<(String, String), LearningProgress>>,
}

#[async_trait]
impl LearningProgressRepository for InMemoryProgressRepository {
    async fn find(&self, user_id: &str, course_id: &str) -> AppResult<Option<LearningProgress>> {
        let key = (user_id.to_string(), course_id.to_string());
        Ok(self.progress.read().await.get(&key).cloned())
    }

    async fn upsert(&self, progress: LearningProgress) -> AppResult<LearningProgress> {
        let key = (progress.user_id.clone(), progress.course_id.clone());
        self.progress.write().await.insert(key, progress.clone());
        Ok(progress)
    }
}

/// In-memory backends plus handles to inspect them from tests.
pub struct TestStore {
    pub questions: Arc<InMemoryQuestionRepository>,
    pub sessions: Arc<InMemorySessionRepository>,
    pub answers: Arc<InMemoryAnswerRepository>,
    pub results: Arc<InMemoryResultRepository>,
    pub progress: Arc<InMemoryProgressRepository>,
}

impl TestStore {
    pub fn new() -> Self {
        Self {
            questions: Arc::new(InMemoryQuestionRepository::default()),
            sessions: Arc::new(InMemorySessionRepository::default()),
            answers: Arc::new(InMemoryAnswerRepository::default()),
            results: Arc::new(InMemoryResultRepository::default()),
            progress: Arc::new(InMemoryProgressRepository::default()),
        }
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            questions: self.questions.clone(),
            sessions: self.sessions.clone(),
            answers: self.answers.clone(),
            results: self.results.clone(),
            progress: self.progress.clone(),
        }
    }

    pub fn app_state(&self, catalog: AssessmentCatalog) -> AppState {
        AppState::from_repositories(Config::test_config(), self.repositories(), catalog)
    }

    /// Adds a short-answer question whose correct answer is "42".
    /// A larger `age_minutes` makes it older; the newest question in a bucket is served first.
    pub async fn seed_question(
        &self,
        id: &str,
        bucket: DifficultyBucket,
        subject: Option<&str>,
        age_minutes: i64,
    ) -> Question {
        let mut question = Question::new(
            &format!("Question {}", id),
            QuestionType::ShortAnswer,
            bucket,
            "42",
        );
        question.id = id.to_string();
        question.subject = subject.map(str::to_string);
        question.explanation = Some(format!("Explanation for {}", id));
        question.created_at = Utc::now() - Duration::minutes(age_minutes);
        self.questions
            .create(question)
            .await
            .expect("seeding question")
    }
}

/// Catalog with one config, `quick`, limited to `max_questions`.
pub fn catalog(max_questions: i32, initial_difficulty: i32) -> AssessmentCatalog {
    let raw = format!(
        r#"[{{"id":"quick","subjects":["Math"],"topics":["Basics"],"max_questions":{},"initial_difficulty":{}}}]"#,
        max_questions, initial_difficulty
    );
    AssessmentCatalog::from_json_str(&raw).expect("valid test catalog")
}
