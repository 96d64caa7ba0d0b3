use std::time::Duration;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use adaptive_assessment_server::{
    app_state::AppState,
    auth::JwtService,
    config::Config,
    graphql::{configure_graphql, create_schema},
    handlers::{configure_routes, json_config, query_config},
    middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();

    if Config::is_production() {
        if let Err(e) = config.validate_for_production() {
            log::error!("Refusing to start with unsafe configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    }

    let app_state = AppState::new(config.clone())
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    spawn_session_sweeper(
        app_state.clone(),
        Duration::from_secs(config.session_sweep_interval_secs.max(1)),
    );

    let schema = create_schema(app_state.clone());
    let jwt_service = JwtService::new(&config.jwt_secret);
    let cors_origin = config.cors_allowed_origin.clone();

    log::info!(
        "Starting HTTP server on {}:{}",
        config.web_server_host,
        config.web_server_port
    );
    log::info!(
        "GraphiQL playground: http://{}:{}/graphiql",
        config.web_server_host,
        config.web_server_port
    );

    HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header()
                .max_age(3600),
            None => Cors::permissive(),
        };

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::Data::new(schema.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            .app_data(json_config())
            .app_data(query_config())
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .wrap(cors)
            .configure(configure_routes)
            .configure(configure_graphql)
    })
    .bind((config.web_server_host.as_str(), config.web_server_port))?
    .run()
    .await
}

/// Periodically cancels sessions that have been idle past the TTL.
fn spawn_session_sweeper(app_state: AppState, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            if let Err(e) = app_state.assessment_service.expire_stale_sessions().await {
                log::warn!("Stale session sweep failed: {}", e);
            }
        }
    });
}
