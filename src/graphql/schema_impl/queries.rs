use async_graphql::{Context, ErrorExtensions, Object, Result};

use crate::{
    app_state::AppState,
    auth::{answer_listing_owner, extract_claims_from_context, require_owner_or_admin},
    models::{
        domain::{AssessmentConfig, AssessmentResult},
        dto::{
            request::{AnswerQueryParams, PaginationParams},
            response::{PaginatedAnswers, PaginatedResults, SessionView},
        },
    },
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn assessment_configs(&self, ctx: &Context<'_>) -> Result<Vec<AssessmentConfig>> {
        let state = ctx.data::<AppState>()?;
        extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        Ok(state.assessment_service.list_configs())
    }

    /// Caller's most recent in-progress session, if any.
    async fn current_assessment(&self, ctx: &Context<'_>) -> Result<Option<SessionView>> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        let session = state
            .assessment_service
            .current_session(&claims.sub)
            .await
            .map_err(|e| e.extend())?;
        Ok(session.map(SessionView::from))
    }

    async fn assessment_session(&self, ctx: &Context<'_>, id: String) -> Result<SessionView> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        let session = state
            .assessment_service
            .get_session(&id)
            .await
            .map_err(|e| e.extend())?;
        require_owner_or_admin(&claims, &session.user_id).map_err(|e| e.extend())?;

        Ok(SessionView::from(session))
    }

    async fn assessment_result(&self, ctx: &Context<'_>, id: String) -> Result<AssessmentResult> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        let result = state
            .assessment_service
            .get_result(&id)
            .await
            .map_err(|e| e.extend())?;
        require_owner_or_admin(&claims, &result.user_id).map_err(|e| e.extend())?;

        Ok(result)
    }

    async fn my_assessment_results(
        &self,
        ctx: &Context<'_>,
        pagination: Option<PaginationParams>,
    ) -> Result<PaginatedResults> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        state
            .assessment_service
            .list_results(&claims.sub, pagination.unwrap_or_default())
            .await
            .map_err(|e| e.extend())
    }

    async fn answers(
        &self,
        ctx: &Context<'_>,
        query: Option<AnswerQueryParams>,
    ) -> Result<PaginatedAnswers> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx).map_err(|e| e.extend())?;

        state
            .answer_service
            .list(answer_listing_owner(&claims), query.unwrap_or_default())
            .await
            .map_err(|e| e.extend())
    }
}
