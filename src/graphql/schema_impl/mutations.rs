use async_graphql::{Context, ErrorExtensions, Object, Result};

use crate::{
    app_state::AppState,
    auth::extract_claims_from_context,
    models::{
        domain::AssessmentResult,
        dto::{
            request::{
                AdvanceAssessmentRequest, CompleteAssessmentRequest, StartAssessmentRequest,
                SubmitAnswerRequest, SubmitAssessmentAnswerRequest,
            },
            response::{
                AdvanceResponse, AnswerOutcome, SessionView, StartAssessmentResponse,
                SubmitAnswerResponse,
            },
        },
    },
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn start_assessment(
        &self,
        ctx: &Context<'_>,
        input: StartAssessmentRequest,
    ) -> Result<StartAssessmentResponse> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        state
            .assessment_service
            .start(&claims.sub, input)
            .await
            .map_err(|e| e.extend())
    }

    async fn submit_assessment_answer(
        &self,
        ctx: &Context<'_>,
        session_id: String,
        input: SubmitAssessmentAnswerRequest,
    ) -> Result<AnswerOutcome> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        state
            .assessment_service
            .record_answer(&claims.sub, &session_id, input)
            .await
            .map_err(|e| e.extend())
    }

    async fn next_question(
        &self,
        ctx: &Context<'_>,
        session_id: String,
        input: AdvanceAssessmentRequest,
    ) -> Result<AdvanceResponse> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        state
            .assessment_service
            .advance(&claims.sub, &session_id, input)
            .await
            .map_err(|e| e.extend())
    }

    async fn complete_assessment(
        &self,
        ctx: &Context<'_>,
        session_id: String,
        input: CompleteAssessmentRequest,
    ) -> Result<AssessmentResult> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        state
            .assessment_service
            .complete(&claims.sub, &session_id, input)
            .await
            .map_err(|e| e.extend())
    }

    async fn cancel_assessment(&self, ctx: &Context<'_>, session_id: String) -> Result<SessionView> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        let session = state
            .assessment_service
            .cancel(&claims.sub, &session_id)
            .await
            .map_err(|e| e.extend())?;
        Ok(SessionView::from(session))
    }

    async fn submit_answer(
        &self,
        ctx: &Context<'_>,
        input: SubmitAnswerRequest,
    ) -> Result<SubmitAnswerResponse> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        state
            .answer_service
            .submit(&claims.sub, input)
            .await
            .map_err(|e| e.extend())
    }
}
