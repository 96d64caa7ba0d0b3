use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Answer, LearningProgress, Question},
        dto::{
            request::{AnswerQueryParams, SubmitAnswerRequest},
            response::{
                AnswerDto, AnswerFeedback, PaginatedAnswers, PaginationMetadata,
                SubmitAnswerResponse,
            },
        },
    },
    repositories::{AnswerFilter, AnswerRepository, LearningProgressRepository},
    services::question_bank::QuestionBank,
};

/// Answers given outside an assessment session, plus per-course progress.
pub struct AnswerService {
    answers: Arc<dyn AnswerRepository>,
    question_bank: QuestionBank,
    progress: Arc<dyn LearningProgressRepository>,
}

impl AnswerService {
    pub fn new(
        answers: Arc<dyn AnswerRepository>,
        question_bank: QuestionBank,
        progress: Arc<dyn LearningProgressRepository>,
    ) -> Self {
        Self {
            answers,
            question_bank,
            progress,
        }
    }

    pub async fn submit(
        &self,
        user_id: &str,
        request: SubmitAnswerRequest,
    ) -> AppResult<SubmitAnswerResponse> {
        request.validate()?;

        let question = self.question_bank.get(&request.question_id).await?;

        if self
            .answers
            .find_standalone(user_id, &question.id)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(format!(
                "Question '{}' has already been answered",
                question.id
            )));
        }

        let is_correct = question.is_correct(&request.answer);
        let answer = self
            .answers
            .create(Answer::record(
                user_id,
                &question,
                &request.answer,
                is_correct,
                request.time_spent.unwrap_or(0),
                None,
            ))
            .await?;

        if let Some(course_id) = &question.course_id {
            if let Err(e) = self.track_progress(&answer, course_id).await {
                log::warn!(
                    "Failed to update learning progress for user {} in course {}: {}",
                    user_id,
                    course_id,
                    e
                );
            }
        }

        Ok(SubmitAnswerResponse {
            feedback: feedback(&question, is_correct),
            answer: AnswerDto::from(answer),
        })
    }

    /// `owner` restricts the listing to one user's answers regardless of the query.
    pub async fn list(
        &self,
        owner: Option<&str>,
        params: AnswerQueryParams,
    ) -> AppResult<PaginatedAnswers> {
        params.validate()?;

        let filter = AnswerFilter {
            user_id: owner.map(str::to_string).or_else(|| params.user_id.clone()),
            question_id: params.question_id.clone(),
        };
        let offset = params.offset();
        let limit = params.limit();

        let (answers, total) = self.answers.list(filter, offset, limit).await?;

        Ok(PaginatedAnswers {
            items: answers.into_iter().map(AnswerDto::from).collect(),
            pagination: PaginationMetadata {
                offset,
                limit,
                total,
            },
        })
    }

    async fn track_progress(&self, answer: &Answer, course_id: &str) -> AppResult<()> {
        let progress = match self.progress.find(&answer.user_id, course_id).await? {
            None => LearningProgress::first_answer(
                &answer.user_id,
                course_id,
                answer.is_correct,
                answer.time_spent,
            ),
            Some(mut progress) => {
                let (total, correct) = self
                    .answers
                    .count_for_course(&answer.user_id, course_id)
                    .await?;
                progress.score = if total > 0 {
                    100.0 * correct as f64 / total as f64
                } else {
                    0.0
                };
                progress.time_spent += answer.time_spent as i64;
                progress.updated_at = Utc::now();
                progress
            }
        };

        self.progress.upsert(progress).await?;
        Ok(())
    }
}

fn feedback(question: &Question, is_correct: bool) -> AnswerFeedback {
    AnswerFeedback {
        is_correct,
        correct_answer: question.correct_answer.clone(),
        explanation: question.explanation.clone(),
        points_earned: if is_correct { question.points } else { 0 },
    }
}
