use axum::{Json, extract::State};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{ExchangeRateConfig, OfficialRateResponse, UpdateConfigRequest},
    queries::config_queries,
};

pub async fn get_config(State(state): State<AppState>) -> Result<Json<ExchangeRateConfig>> {
    Ok(Json(ExchangeRateConfig {
        dollar_rate_official: state.rates.official_rate().await,
        usd_30_days: config_queries::get_usd_30_days(&state.db).await?,
    }))
}

pub async fn update_config(
    State(state): State<AppState>,
    Json(payload): Json<UpdateConfigRequest>,
) -> Result<Json<ExchangeRateConfig>> {
    let usd_30_days = match payload.usd_30_days {
        Some(rate) if rate.is_finite() && rate > 0.0 => {
            let rate = config_queries::update_usd_30_days(&state.db, rate).await?;
            tracing::info!("30-day dollar rate set to {}", rate);
            rate
        }
        Some(rate) => {
            return Err(AppError::BadRequest(format!(
                "usd_30_days debe ser un número positivo (recibido {})",
                rate
            )));
        }
        None => config_queries::get_usd_30_days(&state.db).await?,
    };

    Ok(Json(ExchangeRateConfig {
        dollar_rate_official: state.rates.official_rate().await,
        usd_30_days,
    }))
}

/// Forces a refresh of the official rate.
pub async fn refresh_official_dollar(
    State(state): State<AppState>,
) -> Json<OfficialRateResponse> {
    Json(OfficialRateResponse {
        dollar_rate_official: state.rates.refresh_official_rate().await,
    })
}
