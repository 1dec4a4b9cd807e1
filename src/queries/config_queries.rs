use sqlx::SqlitePool;

use crate::error::Result;

pub const DEFAULT_USD_30_DAYS: f64 = 1000.0;

/// The stored 30-day rate, or the default if the config row is missing.
pub async fn get_usd_30_days(pool: &SqlitePool) -> Result<f64> {
    let rate: Option<f64> = sqlx::query_scalar("SELECT usd_30_days FROM config WHERE id = 1")
        .fetch_optional(pool)
        .await?;

    Ok(rate.unwrap_or(DEFAULT_USD_30_DAYS))
}

pub async fn update_usd_30_days(pool: &SqlitePool, rate: f64) -> Result<f64> {
    let rate: f64 = sqlx::query_scalar(
        r#"
        INSERT INTO config (id, usd_30_days) VALUES (1, ?)
        ON CONFLICT(id) DO UPDATE SET usd_30_days = excluded.usd_30_days
        RETURNING usd_30_days
        "#,
    )
    .bind(rate)
    .fetch_one(pool)
    .await?;

    Ok(rate)
}
