use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sale {
    pub id: i64,
    pub client_id: i64,
    pub product_id: i64,
    pub units: i64,
    pub price_usd_at_sale: f64,
    pub dollar_rate_at_sale: f64,
    pub price_final_ars: f64,
    pub payment_condition: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    pub client_id: i64,
    pub product_id: i64,
    pub units: i64,
    pub price_usd_at_sale: f64,
    pub dollar_rate_at_sale: f64,
    pub price_final_ars: f64,
    pub payment_condition: String,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TopClient {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub rubro: Option<String>,
    pub company: Option<String>,
    pub total_sales: Option<f64>,
    pub sales_count: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TopProduct {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub category: String,
    pub total_units: Option<i64>,
    pub total_sales: Option<f64>,
    pub sales_count: i64,
}
