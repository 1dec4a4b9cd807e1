use crate::error::{AppError, Result};
use std::{env, str::FromStr, time::Duration};

const DEFAULT_PRIMARY_RATES_URL: &str = "https://api.bluelytics.com.ar/v2/latest";
const DEFAULT_FALLBACK_RATES_URL: &str = "https://dolarapi.io/v1/dolares/oficial";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub rates: RatesConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Official dollar rate sources and cache windows.
#[derive(Debug, Clone)]
pub struct RatesConfig {
    pub primary_url: String,
    pub fallback_url: String,
    pub cache_ttl: Duration,
    pub fresh_ttl: Duration,
    pub refresh_interval: Duration,
    pub default_rate: f64,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            primary_url: DEFAULT_PRIMARY_RATES_URL.to_string(),
            fallback_url: DEFAULT_FALLBACK_RATES_URL.to_string(),
            cache_ttl: Duration::from_secs(10 * 60),
            fresh_ttl: Duration::from_secs(5 * 60),
            refresh_interval: Duration::from_secs(15 * 60),
            default_rate: 1000.0,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let rate_defaults = RatesConfig::default();

        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("PORT", "3000")?,
                max_body_size: parse_var("MAX_BODY_SIZE", "10485760")?,
            },
            database: DatabaseConfig {
                url: env::var("DB_URL").unwrap_or_else(|_| "sqlite://sqlite.db?mode=rwc".to_string()),
                max_connections: parse_var("DB_MAX_CONNECTIONS", "5")?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("FRONTEND_URL")?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            rates: RatesConfig {
                primary_url: env::var("RATES_PRIMARY_URL").unwrap_or(rate_defaults.primary_url),
                fallback_url: env::var("RATES_FALLBACK_URL").unwrap_or(rate_defaults.fallback_url),
                cache_ttl: Duration::from_secs(parse_var("RATES_CACHE_TTL_SECS", "600")?),
                fresh_ttl: Duration::from_secs(parse_var("RATES_FRESH_TTL_SECS", "300")?),
                refresh_interval: Duration::from_secs(parse_var(
                    "RATES_REFRESH_INTERVAL_SECS",
                    "900",
                )?),
                default_rate: parse_var("RATES_DEFAULT", "1000")?,
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<T: FromStr>(key: &str, default: &str) -> Result<T> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| AppError::ConfigError(format!("Invalid {} value", key)))
}
