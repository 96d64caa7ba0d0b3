use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_owner_or_admin, AuthenticatedUser},
    errors::AppError,
    models::dto::{
        request::{
            AdvanceAssessmentRequest, CompleteAssessmentRequest, PaginationParams,
            StartAssessmentRequest, SubmitAssessmentAnswerRequest,
        },
        response::SessionView,
    },
};

#[get("/assessments/configs")]
async fn list_configs(
    state: web::Data<AppState>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.assessment_service.list_configs()))
}

#[post("/assessments/start")]
async fn start_assessment(
    state: web::Data<AppState>,
    request: web::Json<StartAssessmentRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state
        .assessment_service
        .start(&auth.0.sub, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(response))
}

#[post("/assessments/{session_id}/answer")]
async fn submit_assessment_answer(
    state: web::Data<AppState>,
    session_id: web::Path<String>,
    request: web::Json<SubmitAssessmentAnswerRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let outcome = state
        .assessment_service
        .record_answer(&auth.0.sub, &session_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[post("/assessments/{session_id}/next")]
async fn next_question(
    state: web::Data<AppState>,
    session_id: web::Path<String>,
    request: web::Json<AdvanceAssessmentRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state
        .assessment_service
        .advance(&auth.0.sub, &session_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/assessments/{session_id}/complete")]
async fn complete_assessment(
    state: web::Data<AppState>,
    session_id: web::Path<String>,
    request: web::Json<CompleteAssessmentRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let result = state
        .assessment_service
        .complete(&auth.0.sub, &session_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[post("/assessments/{session_id}/cancel")]
async fn cancel_assessment(
    state: web::Data<AppState>,
    session_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let session = state
        .assessment_service
        .cancel(&auth.0.sub, &session_id)
        .await?;
    Ok(HttpResponse::Ok().json(SessionView::from(session)))
}

#[get("/assessments/current")]
async fn current_assessment(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let session = state
        .assessment_service
        .current_session(&auth.0.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("No assessment in progress".to_string()))?;
    Ok(HttpResponse::Ok().json(SessionView::from(session)))
}

#[get("/assessments/sessions/{session_id}")]
async fn get_session(
    state: web::Data<AppState>,
    session_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let session = state.assessment_service.get_session(&session_id).await?;
    require_owner_or_admin(&auth.0, &session.user_id)?;
    Ok(HttpResponse::Ok().json(SessionView::from(session)))
}

#[get("/assessments/results")]
async fn list_results(
    state: web::Data<AppState>,
    query: web::Query<PaginationParams>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let page = state
        .assessment_service
        .list_results(&auth.0.sub, query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/assessments/results/{result_id}")]
async fn get_result(
    state: web::Data<AppState>,
    result_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let result = state.assessment_service.get_result(&result_id).await?;
    require_owner_or_admin(&auth.0, &result.user_id)?;
    Ok(HttpResponse::Ok().json(result))
}
