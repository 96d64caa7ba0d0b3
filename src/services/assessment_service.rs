use std::sync::Arc;

use chrono::{Duration, Utc};
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{
            Answer, AssessmentCatalog, AssessmentConfig, AssessmentResult, AssessmentSession,
            SessionStatus,
        },
        dto::{
            request::{
                AdvanceAssessmentRequest, CompleteAssessmentRequest, PaginationParams,
                StartAssessmentRequest, SubmitAssessmentAnswerRequest,
            },
            response::{
                AdvanceResponse, AnswerOutcome, PaginatedResults, PaginationMetadata,
                QuestionView, StartAssessmentResponse,
            },
        },
    },
    repositories::{AnswerRepository, AssessmentResultRepository, AssessmentSessionRepository},
    services::{
        difficulty::DifficultyController,
        question_bank::QuestionBank,
        result_synthesizer::{AnsweredItem, ResultSynthesizer},
        termination::TerminationPolicy,
    },
};

/// Drives adaptive sessions: start, answer, advance, complete.
pub struct AssessmentService {
    sessions: Arc<dyn AssessmentSessionRepository>,
    answers: Arc<dyn AnswerRepository>,
    results: Arc<dyn AssessmentResultRepository>,
    question_bank: QuestionBank,
    catalog: Arc<AssessmentCatalog>,
    session_ttl: Duration,
}

impl AssessmentService {
    pub fn new(
        sessions: Arc<dyn AssessmentSessionRepository>,
        answers: Arc<dyn AnswerRepository>,
        results: Arc<dyn AssessmentResultRepository>,
        question_bank: QuestionBank,
        catalog: Arc<AssessmentCatalog>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            sessions,
            answers,
            results,
            question_bank,
            catalog,
            session_ttl,
        }
    }

    pub fn list_configs(&self) -> Vec<AssessmentConfig> {
        self.catalog.list()
    }

    pub async fn start(
        &self,
        caller_id: &str,
        request: StartAssessmentRequest,
    ) -> AppResult<StartAssessmentResponse> {
        request.validate()?;
        require_caller(caller_id, &request.user_id)?;

        let config = self.catalog.get(&request.config_id)?;
        let bucket = DifficultyController::bucket_for(config.initial_difficulty);

        let first_question = self
            .question_bank
            .fetch_next(bucket, &[])
            .await?
            .ok_or_else(|| {
                AppError::NoQuestionsAvailable(format!(
                    "No {} questions available to start '{}'",
                    bucket.as_str(),
                    config.id
                ))
            })?;

        let session = self
            .sessions
            .create(AssessmentSession::start(
                &request.user_id,
                config,
                &first_question.id,
            ))
            .await?;

        // Earlier sessions are only superseded once the new one is stored.
        self.supersede_others(&session.user_id, &session.id).await;

        log::info!(
            "Started assessment session {} for user {} with config '{}'",
            session.id,
            session.user_id,
            session.config_id
        );

        Ok(StartAssessmentResponse {
            session_id: session.id,
            question: QuestionView::from(&first_question),
            time_limit_seconds: config.time_limit_seconds,
        })
    }

    /// Grades the answer to the pinned question and moves the difficulty.
    pub async fn record_answer(
        &self,
        caller_id: &str,
        session_id: &str,
        request: SubmitAssessmentAnswerRequest,
    ) -> AppResult<AnswerOutcome> {
        request.validate()?;
        require_caller(caller_id, &request.user_id)?;

        let session = self.load_active(session_id, &request.user_id).await?;

        if session.current_question_id.as_deref() != Some(request.question_id.as_str()) {
            return Err(AppError::Conflict(format!(
                "SessionMismatch: question '{}' is not awaiting an answer in session {}",
                request.question_id, session.id
            )));
        }

        let question = self.question_bank.get(&request.question_id).await?;
        let is_correct = question.is_correct(&request.answer);

        let previous = session.clone();
        let mut session = session;
        session.questions_answered += 1;
        if is_correct {
            session.correct_answers += 1;
        }
        session.current_difficulty = DifficultyController::next_difficulty(
            session.current_difficulty,
            session.correct_answers,
            session.questions_answered,
        );
        session.current_question_id = None;
        session.last_answered_at = Some(Utc::now());

        let stored = self.sessions.update(session).await?;

        let answer = Answer::record(
            &request.user_id,
            &question,
            &request.answer,
            is_correct,
            request.time_spent.unwrap_or(0),
            Some(&stored.id),
        );
        if let Err(e) = self.answers.create(answer).await {
            self.restore(previous, stored.version).await;
            return Err(e);
        }

        log::debug!(
            "Session {} answer to {} correct={} difficulty={}",
            stored.id,
            question.id,
            is_correct,
            stored.current_difficulty
        );

        Ok(AnswerOutcome {
            is_correct,
            explanation: question.explanation,
            new_difficulty: stored.current_difficulty,
            performance_ratio: stored.performance_ratio(),
        })
    }

    /// Pins the next question, or finalizes the session when it should end.
    pub async fn advance(
        &self,
        caller_id: &str,
        session_id: &str,
        request: AdvanceAssessmentRequest,
    ) -> AppResult<AdvanceResponse> {
        request.validate()?;
        require_caller(caller_id, &request.user_id)?;

        let mut session = self.load_active(session_id, &request.user_id).await?;

        if let Some(pinned_id) = &session.current_question_id {
            let question = self.question_bank.get(pinned_id).await?;
            return Ok(AdvanceResponse::next_question(QuestionView::from(&question)));
        }

        let config = self.catalog.get(&session.config_id)?;
        let answers = self.answers.find_by_session(&session.id).await?;
        let recent: Vec<bool> = answers.iter().map(|a| a.is_correct).collect();

        if TerminationPolicy::should_complete(
            session.questions_answered,
            config.max_questions,
            &recent,
        ) {
            let result = self.finalize(session, &answers, None).await?;
            return Ok(AdvanceResponse::complete(result.id));
        }

        let bucket = DifficultyController::bucket_for(session.current_difficulty);
        let seen: Vec<String> = answers.iter().map(|a| a.question_id.clone()).collect();

        match self.question_bank.fetch_next(bucket, &seen).await? {
            Some(question) => {
                session.current_question_id = Some(question.id.clone());
                self.sessions.update(session).await?;
                Ok(AdvanceResponse::next_question(QuestionView::from(&question)))
            }
            None => {
                log::info!(
                    "No unseen {} questions left for session {}, completing",
                    bucket.as_str(),
                    session.id
                );
                let result = self.finalize(session, &answers, None).await?;
                Ok(AdvanceResponse::complete(result.id))
            }
        }
    }

    /// Idempotent: a completed session returns its stored result.
    pub async fn complete(
        &self,
        caller_id: &str,
        session_id: &str,
        request: CompleteAssessmentRequest,
    ) -> AppResult<AssessmentResult> {
        request.validate()?;
        require_caller(caller_id, &request.user_id)?;

        let session = self.find_owned(session_id, &request.user_id).await?;

        match session.status {
            SessionStatus::Completed => {
                let result_id = session.result_id.as_deref().ok_or_else(|| {
                    AppError::InternalError(format!(
                        "Completed session {} has no result",
                        session.id
                    ))
                })?;
                self.get_result(result_id).await
            }
            SessionStatus::Cancelled => Err(AppError::Conflict(format!(
                "Assessment session {} was cancelled",
                session.id
            ))),
            SessionStatus::InProgress => {
                let answers = self.answers.find_by_session(&session.id).await?;
                self.finalize(session, &answers, request.time_spent).await
            }
        }
    }

    pub async fn cancel(&self, caller_id: &str, session_id: &str) -> AppResult<AssessmentSession> {
        let session = self.find_owned(session_id, caller_id).await?;

        match session.status {
            SessionStatus::Cancelled => Ok(session),
            SessionStatus::Completed => Err(AppError::Conflict(format!(
                "Assessment session {} is already completed",
                session.id
            ))),
            SessionStatus::InProgress => {
                let cancelled = self.mark_cancelled(session).await?;
                log::info!("Cancelled assessment session {}", cancelled.id);
                Ok(cancelled)
            }
        }
    }

    pub async fn current_session(&self, user_id: &str) -> AppResult<Option<AssessmentSession>> {
        self.sessions.find_latest_in_progress(user_id).await
    }

    pub async fn get_session(&self, session_id: &str) -> AppResult<AssessmentSession> {
        self.sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Assessment session '{}' not found", session_id))
            })
    }

    pub async fn get_result(&self, result_id: &str) -> AppResult<AssessmentResult> {
        self.results
            .find_by_id(result_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Assessment result '{}' not found", result_id))
            })
    }

    pub async fn list_results(
        &self,
        user_id: &str,
        pagination: PaginationParams,
    ) -> AppResult<PaginatedResults> {
        pagination.validate()?;

        let offset = pagination.offset();
        let limit = pagination.limit();
        let (items, total) = self.results.list_by_user(user_id, offset, limit).await?;

        Ok(PaginatedResults {
            items,
            pagination: PaginationMetadata {
                offset,
                limit,
                total,
            },
        })
    }

    /// Cancels every in-progress session idle for longer than the TTL.
    pub async fn expire_stale_sessions(&self) -> AppResult<usize> {
        let cutoff = Utc::now() - self.session_ttl;
        let stale = self.sessions.find_stale_in_progress(cutoff).await?;

        let mut expired = 0;
        for session in stale {
            let session_id = session.id.clone();
            match self.mark_cancelled(session).await {
                Ok(_) => expired += 1,
                Err(AppError::Conflict(_)) => {
                    log::debug!("Session {} was touched while expiring, skipped", session_id)
                }
                Err(e) => return Err(e),
            }
        }

        if expired > 0 {
            log::info!("Expired {} stale assessment sessions", expired);
        }
        Ok(expired)
    }

    async fn find_owned(&self, session_id: &str, user_id: &str) -> AppResult<AssessmentSession> {
        let session = self.get_session(session_id).await?;
        if session.user_id != user_id {
            return Err(AppError::Unauthorized(format!(
                "Assessment session {} belongs to another user",
                session_id
            )));
        }
        Ok(session)
    }

    /// In-progress, owned by `user_id` and not idle past the TTL.
    async fn load_active(&self, session_id: &str, user_id: &str) -> AppResult<AssessmentSession> {
        let session = self.find_owned(session_id, user_id).await?;

        if !session.is_in_progress() {
            return Err(AppError::NotFound(format!(
                "No in-progress assessment session '{}'",
                session_id
            )));
        }

        if session.is_stale(Utc::now(), self.session_ttl) {
            let session_id = session.id.clone();
            self.mark_cancelled(session).await?;
            log::info!("Assessment session {} expired on access", session_id);
            return Err(AppError::Conflict(format!(
                "Assessment session {} expired and was cancelled",
                session_id
            )));
        }

        Ok(session)
    }

    /// Best-effort: the new session already exists, so failures are only logged.
    async fn supersede_others(&self, user_id: &str, keep_id: &str) {
        let in_progress = match self.sessions.find_in_progress_by_user(user_id).await {
            Ok(sessions) => sessions,
            Err(e) => {
                log::warn!("Failed to look up sessions superseded by {}: {}", keep_id, e);
                return;
            }
        };

        for superseded in in_progress.into_iter().filter(|s| s.id != keep_id) {
            let superseded_id = superseded.id.clone();
            match self.mark_cancelled(superseded).await {
                Ok(_) => log::info!("Cancelled superseded assessment session {}", superseded_id),
                Err(e) => log::warn!(
                    "Failed to cancel superseded session {}: {}",
                    superseded_id,
                    e
                ),
            }
        }
    }

    async fn mark_cancelled(&self, session: AssessmentSession) -> AppResult<AssessmentSession> {
        let mut session = session;
        session.status = SessionStatus::Cancelled;
        session.current_question_id = None;
        self.sessions.update(session).await
    }

    async fn finalize(
        &self,
        session: AssessmentSession,
        answers: &[Answer],
        time_spent: Option<i64>,
    ) -> AppResult<AssessmentResult> {
        let items: Vec<AnsweredItem> = answers.iter().map(AnsweredItem::from).collect();
        let time_spent =
            time_spent.unwrap_or_else(|| answers.iter().map(|a| a.time_spent as i64).sum());

        let result =
            ResultSynthesizer::synthesize(&items).into_result(&session.user_id, &session.id, time_spent);

        let previous = session.clone();
        let mut session = session;
        session.status = SessionStatus::Completed;
        session.completed_at = Some(result.completed_at);
        session.current_question_id = None;
        session.result_id = Some(result.id.clone());

        let stored = self.sessions.update(session).await?;

        let result = match self.results.create(result).await {
            Ok(result) => result,
            Err(e) => {
                self.restore(previous, stored.version).await;
                return Err(e);
            }
        };

        log::info!(
            "Completed assessment session {} with {:.1}% over {} questions",
            stored.id,
            result.overall_percentage,
            result.total_questions
        );

        Ok(result)
    }

    /// Puts `previous` back after a failed follow-up write.
    async fn restore(&self, previous: AssessmentSession, current_version: i64) {
        let session_id = previous.id.clone();
        let mut previous = previous;
        previous.version = current_version;
        if let Err(e) = self.sessions.update(previous).await {
            log::error!("Failed to restore assessment session {}: {}", session_id, e);
        }
    }
}

fn require_caller(caller_id: &str, user_id: &str) -> AppResult<()> {
    if caller_id != user_id {
        return Err(AppError::Unauthorized(
            "You can only act on your own assessments".to_string(),
        ));
    }
    Ok(())
}
