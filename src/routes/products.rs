use axum::{
    Json,
    extract::{Multipart, Path, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        CartLinePrice, CartRequest, ConfirmUploadRequest, CreateProductRequest,
        ExchangeRateConfig, ParseResult, Product,
    },
    queries::{config_queries, product_queries},
    services::{
        catalog_parser,
        price_calculator::{self, PricedLine},
    },
    utils::extractors::read_file_field,
};

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = product_queries::find_all(&state.db).await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>> {
    let product = product_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Producto {} no encontrado", id)))?;

    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<Json<Product>> {
    if payload.code.trim().is_empty() {
        return Err(AppError::BadRequest("El código es obligatorio".to_string()));
    }

    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("El nombre es obligatorio".to_string()));
    }

    if product_queries::find_by_code(&state.db, &payload.code)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Ya existe un producto con código {}",
            payload.code
        )));
    }

    let product = product_queries::create_product(&state.db, &payload).await?;

    Ok(Json(product))
}

/// Parses the uploaded workbook and returns a preview without storing anything.
pub async fn upload_catalog(mut multipart: Multipart) -> Result<Json<ParseResult>> {
    let bytes = read_file_field(&mut multipart, "file").await?;
    tracing::info!("Parsing uploaded catalog ({} bytes)", bytes.len());

    let result = tokio::task::spawn_blocking(move || catalog_parser::parse_workbook(&bytes))
        .await
        .map_err(|e| AppError::InternalError(format!("Parser task failed: {}", e)))??;

    tracing::info!(
        "Parsed {} products with {} warnings",
        result.total_parsed,
        result.warnings.len()
    );

    Ok(Json(result))
}

pub async fn confirm_upload(
    State(state): State<AppState>,
    Json(payload): Json<ConfirmUploadRequest>,
) -> Result<Json<Vec<Product>>> {
    let rows = payload
        .products
        .ok_or_else(|| AppError::BadRequest("Se requiere la lista de productos".to_string()))?;

    let products = product_queries::replace_catalog(&state.db, &rows).await?;

    Ok(Json(products))
}

pub async fn calc_cart(
    State(state): State<AppState>,
    Json(payload): Json<CartRequest>,
) -> Result<Json<Vec<CartLinePrice>>> {
    let items = payload
        .products
        .ok_or_else(|| AppError::BadRequest("Se requiere la lista de productos".to_string()))?;

    let ids: Vec<i64> = items.iter().map(|item| item.id).collect();
    let products = product_queries::find_by_ids(&state.db, &ids).await?;

    let lines = items
        .iter()
        .map(|item| {
            let product = products.get(&item.id).ok_or_else(|| {
                AppError::NotFound(format!("Producto {} no encontrado", item.id))
            })?;
            Ok(PricedLine {
                product,
                quantity: item.quantity,
                payment_method: item.payment_method,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let rates = ExchangeRateConfig {
        dollar_rate_official: state.rates.official_rate().await,
        usd_30_days: config_queries::get_usd_30_days(&state.db).await?,
    };

    Ok(Json(price_calculator::calculate_cart(&lines, &rates)))
}
