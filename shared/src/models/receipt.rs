//! Receipt email DTOs

use serde::{Deserialize, Serialize};

/// One printed receipt line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

/// `POST /send-receipt` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRequest {
    pub email: String,
    pub order_details: Vec<ReceiptLine>,
    pub amount: f64,
}
