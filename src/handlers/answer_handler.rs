use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{answer_listing_owner, AuthenticatedUser},
    errors::AppError,
    models::dto::request::{AnswerQueryParams, SubmitAnswerRequest},
};

#[post("/answers")]
async fn submit_answer(
    state: web::Data<AppState>,
    request: web::Json<SubmitAnswerRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state
        .answer_service
        .submit(&auth.0.sub, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(response))
}

#[get("/answers")]
async fn list_answers(
    state: web::Data<AppState>,
    query: web::Query<AnswerQueryParams>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let page = state
        .answer_service
        .list(answer_listing_owner(&auth.0), query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}
