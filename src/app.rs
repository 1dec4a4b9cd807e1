use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::AppConfig,
    database,
    error::{AppError, Result},
    routes,
    services::dollar_service::{self, DollarService, HttpRateSource},
};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub rates: Arc<DollarService>,
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let pool = database::create_pool(&config.database).await?;

    let source = Arc::new(HttpRateSource::new(&config.rates));
    let rates = Arc::new(DollarService::new(source, &config.rates));
    tokio::spawn(dollar_service::run_refresh_loop(
        rates.clone(),
        config.rates.refresh_interval,
    ));

    let state = AppState { db: pool, rates };
    let allowed_origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_origin(allowed_origins);

    Ok(router(state)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(cors))
}

/// The routes with state and request tracing, without network-facing layers.
pub fn router(state: AppState) -> Router {
    routes::create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
