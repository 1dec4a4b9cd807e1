use serde::{Deserialize, Serialize};

/// How the client pays; decides which dollar rate applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "contado")]
    Contado,
    #[serde(rename = "echeck")]
    Echeck,
    #[serde(rename = "30_dias")]
    ThirtyDays,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Contado => "Contado",
            PaymentMethod::Echeck => "E-check",
            PaymentMethod::ThirtyDays => "30 días",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateConfig {
    pub dollar_rate_official: f64,
    pub usd_30_days: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateConfigRequest {
    pub usd_30_days: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceCalculation {
    pub price_base: f64,
    pub iva_amount: f64,
    pub price_ars: f64,
}

#[derive(Debug, Serialize)]
pub struct OfficialRateResponse {
    pub dollar_rate_official: f64,
}
