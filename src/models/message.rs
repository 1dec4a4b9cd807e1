use serde::{Deserialize, Serialize};

use super::PaymentMethod;

#[derive(Debug, Clone, Deserialize)]
pub struct MessageItem {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub quantity: i64,
    pub price_usd: f64,
    pub iva_included: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageGenerationInput {
    pub items: Vec<MessageItem>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub client_name: Option<String>,
    pub delivery_info: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedMessages {
    pub client_message: String,
    pub company_message: String,
}
