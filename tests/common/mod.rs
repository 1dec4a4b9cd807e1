#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::Request,
};
use cotizador_back::{
    AppState,
    app,
    config::{DatabaseConfig, RatesConfig},
    database,
    error::Result,
    models::ParsedProductRow,
    services::dollar_service::{DollarService, RateSource},
};
use sqlx::SqlitePool;

pub const OFFICIAL_RATE: f64 = 1000.0;

/// Always answers with the same official rate.
pub struct FixedRate(pub f64);

#[async_trait]
impl RateSource for FixedRate {
    async fn fetch_official_rate(&self) -> Result<f64> {
        Ok(self.0)
    }
}

/// Fresh in-memory database with migrations applied. A single connection
/// keeps every query on the same memory database.
pub async fn test_pool() -> SqlitePool {
    database::create_pool(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    })
    .await
    .expect("in-memory pool")
}

pub async fn test_state() -> AppState {
    AppState {
        db: test_pool().await,
        rates: Arc::new(DollarService::new(
            Arc::new(FixedRate(OFFICIAL_RATE)),
            &RatesConfig::default(),
        )),
    }
}

pub fn test_app(state: AppState) -> Router {
    app::router(state)
}

pub fn parsed_row(code: &str, name: &str, price_usd: f64) -> ParsedProductRow {
    ParsedProductRow {
        code: code.to_string(),
        name: name.to_string(),
        provider: "Nipro".to_string(),
        origin: "Japón".to_string(),
        price_usd,
        price_alt_usd: 0.0,
        iva_included: true,
        category: "Hemodiálisis".to_string(),
        sheet: "Lista".to_string(),
    }
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub const BOUNDARY: &str = "cotizador-test-boundary";

/// Multipart body with a single file field.
pub fn multipart_request(uri: &str, field: &str, filename: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .expect("request")
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}
