pub mod answer_handler;
pub mod assessment_handler;
pub mod health_handler;

use actix_web::web;

use crate::{auth::AuthMiddleware, errors::AppError};

pub use health_handler::{health_check, health_check_live, health_check_ready};

/// Malformed or incomplete JSON bodies surface as `VALIDATION_ERROR` responses.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(err.to_string()).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(err.to_string()).into()
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_ready)
        .service(health_check_live)
        .service(
            web::scope("/api")
                .wrap(AuthMiddleware)
                .service(assessment_handler::list_configs)
                .service(assessment_handler::start_assessment)
                .service(assessment_handler::current_assessment)
                .service(assessment_handler::list_results)
                .service(assessment_handler::get_result)
                .service(assessment_handler::get_session)
                .service(assessment_handler::submit_assessment_answer)
                .service(assessment_handler::next_question)
                .service(assessment_handler::complete_assessment)
                .service(assessment_handler::cancel_assessment)
                .service(answer_handler::submit_answer)
                .service(answer_handler::list_answers),
        );
}
