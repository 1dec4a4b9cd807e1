use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::PaymentMethod;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub category: String,
    pub price_usd: f64,
    pub iva_included: bool,
    pub description: Option<String>,
    pub provider: Option<String>,
    pub origin: Option<String>,
    pub price_alt_usd: Option<f64>,
    pub sheet: Option<String>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub code: String,
    pub name: String,
    pub category: String,
    pub price_usd: f64,
    #[serde(default)]
    pub iva_included: bool,
    pub description: Option<String>,
    pub provider: Option<String>,
    pub origin: Option<String>,
    pub price_alt_usd: Option<f64>,
    pub sheet: Option<String>,
}

impl From<&ParsedProductRow> for CreateProductRequest {
    fn from(row: &ParsedProductRow) -> Self {
        Self {
            code: row.code.clone(),
            name: row.name.clone(),
            category: row.category.clone(),
            price_usd: row.price_usd,
            iva_included: row.iva_included,
            description: Some(row.name.clone()),
            provider: non_empty(&row.provider),
            origin: non_empty(&row.origin),
            price_alt_usd: Some(row.price_alt_usd),
            sheet: non_empty(&row.sheet),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// A product row as read from an uploaded workbook, before it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedProductRow {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub origin: String,
    pub price_usd: f64,
    #[serde(default)]
    pub price_alt_usd: f64,
    #[serde(default = "default_iva_included")]
    pub iva_included: bool,
    pub category: String,
    #[serde(default)]
    pub sheet: String,
}

fn default_iva_included() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub preview: Vec<ParsedProductRow>,
    pub total_parsed: usize,
    pub warnings: Vec<String>,
    pub by_categories: BTreeMap<String, usize>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmUploadRequest {
    pub products: Option<Vec<ParsedProductRow>>,
}

#[derive(Debug, Deserialize)]
pub struct CartRequest {
    pub products: Option<Vec<CartItem>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartItem {
    pub id: i64,
    pub quantity: i64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLinePrice {
    pub id: i64,
    pub quantity: i64,
    pub price_base: f64,
    pub iva_amount: f64,
    pub price_ars: f64,
    pub total_ars: f64,
    pub payment_method: PaymentMethod,
}
