use actix_web::{http::header::AUTHORIZATION, web, HttpRequest, HttpResponse};
use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::{
    auth::{bearer_token, JwtService},
    graphql::Schema,
};

/// Resolvers that need a caller read the claims attached here; an invalid token is treated as absent.
pub async fn graphql(
    schema: web::Data<Schema>,
    jwt_service: web::Data<JwtService>,
    http_request: HttpRequest,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = request.into_inner();

    let claims = http_request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .and_then(|token| match jwt_service.validate_token(token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                log::debug!("Ignoring GraphQL bearer token: {}", e);
                None
            }
        });

    if let Some(claims) = claims {
        request = request.data(claims);
    }

    schema.execute(request).await.into()
}

pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}

pub fn configure_graphql(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/graphql").route(web::post().to(graphql)))
        .service(web::resource("/graphiql").route(web::get().to(graphiql)));
}
