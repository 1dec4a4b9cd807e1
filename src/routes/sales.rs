use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{CreateSaleRequest, Sale, TopClient, TopProduct},
    queries::sale_queries,
};

pub async fn create_sale(
    State(state): State<AppState>,
    Json(payload): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<Sale>)> {
    if payload.units <= 0 {
        return Err(AppError::BadRequest(
            "La cantidad de unidades debe ser mayor a cero".to_string(),
        ));
    }

    let sale = sale_queries::create_sale(&state.db, &payload).await?;

    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn sales_by_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Sale>>> {
    let sales = sale_queries::find_by_client(&state.db, id).await?;
    Ok(Json(sales))
}

pub async fn top_clients(State(state): State<AppState>) -> Result<Json<Vec<TopClient>>> {
    let clients = sale_queries::top_clients(&state.db).await?;
    Ok(Json(clients))
}

pub async fn top_products(State(state): State<AppState>) -> Result<Json<Vec<TopProduct>>> {
    let products = sale_queries::top_products(&state.db).await?;
    Ok(Json(products))
}
