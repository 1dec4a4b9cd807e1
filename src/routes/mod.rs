mod clients;
mod config;
mod health;
mod messages;
mod products;
mod sales;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            "/clients",
            get(clients::list_clients).post(clients::create_client),
        )
        .route("/clients/import", post(clients::import_clients))
        .route(
            "/clients/{id}",
            get(clients::get_client)
                .patch(clients::update_client)
                .delete(clients::delete_client),
        )
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/products/upload", post(products::upload_catalog))
        .route("/products/confirm-upload", post(products::confirm_upload))
        .route("/products/calc-carrito", post(products::calc_cart))
        .route("/products/{id}", get(products::get_product))
        .route(
            "/config",
            get(config::get_config).patch(config::update_config),
        )
        .route(
            "/config/dollar-oficial",
            get(config::refresh_official_dollar),
        )
        .route("/messages/generate", post(messages::generate_messages))
        .route("/sales", post(sales::create_sale))
        .route("/sales/by-client/{id}", get(sales::sales_by_client))
        .route("/sales/analytics/top-clients", get(sales::top_clients))
        .route("/sales/analytics/top-products", get(sales::top_products))
}
