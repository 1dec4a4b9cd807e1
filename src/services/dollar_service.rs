use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::{
    sync::RwLock,
    time::{self, MissedTickBehavior},
};

use crate::{
    config::RatesConfig,
    error::{AppError, Result},
};

/// Somewhere the official dollar selling rate can be fetched from.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_official_rate(&self) -> Result<f64>;
}

/// Bluelytics first, the secondary API when that fails.
pub struct HttpRateSource {
    client: reqwest::Client,
    primary_url: String,
    fallback_url: String,
}

impl HttpRateSource {
    pub fn new(config: &RatesConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            primary_url: config.primary_url.clone(),
            fallback_url: config.fallback_url.clone(),
        }
    }

    async fn fetch_json(&self, url: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::InternalError(format!("Rate request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(AppError::InternalError(format!(
                "Rate API {} returned {}",
                url,
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to parse rate response: {}", e)))
    }

    async fn fetch_primary(&self) -> Result<f64> {
        let body = self.fetch_json(&self.primary_url).await?;
        bluelytics_rate(&body).ok_or_else(|| {
            AppError::InternalError("Invalid response format from Bluelytics".to_string())
        })
    }

    async fn fetch_fallback(&self) -> Result<f64> {
        let body = self.fetch_json(&self.fallback_url).await?;
        dolarapi_rate(&body).ok_or_else(|| {
            AppError::InternalError("Invalid response format from alternative API".to_string())
        })
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch_official_rate(&self) -> Result<f64> {
        match self.fetch_primary().await {
            Ok(rate) => Ok(rate),
            Err(e) => {
                tracing::warn!("Bluelytics failed: {}, trying alternative", e);
                self.fetch_fallback().await.inspect_err(|e| {
                    tracing::error!("Alternative rate API also failed: {}", e);
                })
            }
        }
    }
}

fn bluelytics_rate(body: &Value) -> Option<f64> {
    positive(body.get("oficial")?.get("value_sell")?.as_f64()?)
}

fn dolarapi_rate(body: &Value) -> Option<f64> {
    positive(body.get("venta")?.as_f64()?)
}

fn positive(rate: f64) -> Option<f64> {
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

#[derive(Debug, Clone, Copy)]
struct CachedRate {
    rate: f64,
    fetched_at: Instant,
}

/// Official dollar rate with a time-boxed cache.
///
/// A failed fetch falls back to the last known rate, however old, and to the
/// configured default when nothing was ever fetched.
pub struct DollarService {
    source: Arc<dyn RateSource>,
    cache: RwLock<Option<CachedRate>>,
    cache_ttl: Duration,
    fresh_ttl: Duration,
    default_rate: f64,
}

impl DollarService {
    pub fn new(source: Arc<dyn RateSource>, config: &RatesConfig) -> Self {
        Self {
            source,
            cache: RwLock::new(None),
            cache_ttl: config.cache_ttl,
            fresh_ttl: config.fresh_ttl,
            default_rate: config.default_rate,
        }
    }

    pub async fn official_rate(&self) -> f64 {
        if let Some(cached) = *self.cache.read().await {
            if cached.fetched_at.elapsed() < self.cache_ttl {
                tracing::debug!("Using cached dollar rate: {}", cached.rate);
                return cached.rate;
            }
        }

        self.fetch_and_store().await
    }

    /// Skips the cache and fetches a new rate.
    pub async fn refresh_official_rate(&self) -> f64 {
        self.fetch_and_store().await
    }

    pub async fn is_cache_fresh(&self) -> bool {
        let cached = *self.cache.read().await;
        cached.is_some_and(|cached| cached.fetched_at.elapsed() < self.fresh_ttl)
    }

    /// Refreshes first when the cached rate is older than the fresh window.
    pub async fn official_rate_fresh(&self) -> f64 {
        if !self.is_cache_fresh().await {
            tracing::debug!("Cache not fresh, refreshing dollar rate before operation");
            return self.refresh_official_rate().await;
        }
        self.official_rate().await
    }

    async fn fetch_and_store(&self) -> f64 {
        match self.source.fetch_official_rate().await {
            Ok(rate) => {
                *self.cache.write().await = Some(CachedRate {
                    rate,
                    fetched_at: Instant::now(),
                });
                tracing::info!("Dollar rate updated: {}", rate);
                rate
            }
            Err(e) => {
                tracing::error!("Error fetching dollar rate: {}", e);
                match *self.cache.read().await {
                    Some(cached) => {
                        tracing::warn!("Using expired cache as fallback: {}", cached.rate);
                        cached.rate
                    }
                    None => {
                        tracing::warn!("No cache available, using default rate: {}", self.default_rate);
                        self.default_rate
                    }
                }
            }
        }
    }
}

/// Refreshes the official rate on a fixed interval, forever.
pub async fn run_refresh_loop(service: Arc<DollarService>, every: Duration) {
    tracing::info!("Dollar refresh worker started with interval {:?}", every);
    let mut interval = time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        let rate = service.refresh_official_rate().await;
        tracing::info!("[Cron] Dollar rate refreshed: {}", rate);
    }
}
