use std::sync::Arc;

use chrono::Duration;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    models::domain::AssessmentCatalog,
    repositories::{
        AnswerRepository, AssessmentResultRepository, AssessmentSessionRepository,
        LearningProgressRepository, MongoAnswerRepository, MongoAssessmentResultRepository,
        MongoAssessmentSessionRepository, MongoLearningProgressRepository,
        MongoQuestionRepository, QuestionRepository,
    },
    services::{AnswerService, AssessmentService, QuestionBank},
};

/// Storage backends the services are built on.
#[derive(Clone)]
pub struct Repositories {
    pub questions: Arc<dyn QuestionRepository>,
    pub sessions: Arc<dyn AssessmentSessionRepository>,
    pub answers: Arc<dyn AnswerRepository>,
    pub results: Arc<dyn AssessmentResultRepository>,
    pub progress: Arc<dyn LearningProgressRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub assessment_service: Arc<AssessmentService>,
    pub answer_service: Arc<AnswerService>,
    pub config: Arc<Config>,
    /// `None` when running on non-Mongo repositories.
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let questions = Arc::new(MongoQuestionRepository::new(&db));
        questions.ensure_indexes().await?;
        let sessions = Arc::new(MongoAssessmentSessionRepository::new(&db));
        sessions.ensure_indexes().await?;
        let answers = Arc::new(MongoAnswerRepository::new(&db));
        answers.ensure_indexes().await?;
        let results = Arc::new(MongoAssessmentResultRepository::new(&db));
        results.ensure_indexes().await?;
        let progress = Arc::new(MongoLearningProgressRepository::new(&db));
        progress.ensure_indexes().await?;

        let catalog = load_catalog(&config)?;

        let repositories = Repositories {
            questions,
            sessions,
            answers,
            results,
            progress,
        };

        let mut state = Self::from_repositories(config, repositories, catalog);
        state.db = Some(db);
        Ok(state)
    }

    pub fn from_repositories(
        config: Config,
        repositories: Repositories,
        catalog: AssessmentCatalog,
    ) -> Self {
        let session_ttl = Duration::minutes(config.session_ttl_minutes);

        let assessment_service = Arc::new(AssessmentService::new(
            repositories.sessions,
            repositories.answers.clone(),
            repositories.results,
            QuestionBank::new(repositories.questions.clone()),
            Arc::new(catalog),
            session_ttl,
        ));

        let answer_service = Arc::new(AnswerService::new(
            repositories.answers,
            QuestionBank::new(repositories.questions),
            repositories.progress,
        ));

        Self {
            assessment_service,
            answer_service,
            config: Arc::new(config),
            db: None,
        }
    }
}

fn load_catalog(config: &Config) -> AppResult<AssessmentCatalog> {
    match &config.assessment_config_path {
        Some(path) => {
            let catalog = AssessmentCatalog::from_json_file(path)?;
            log::info!(
                "Loaded {} assessment configs from {}",
                catalog.list().len(),
                path
            );
            Ok(catalog)
        }
        None => {
            log::info!("Using built-in assessment configs");
            Ok(AssessmentCatalog::builtin())
        }
    }
}
