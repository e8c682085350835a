//! Payment intent DTOs

use serde::{Deserialize, Serialize};

/// Default checkout currency
pub const DEFAULT_CURRENCY: &str = "inr";

/// `POST /create-payment-intent` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntentRequest {
    /// Amount in currency unit (converted to minor units for the processor)
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
}

impl PaymentIntentRequest {
    /// Requested currency, or the shop default
    pub fn currency_or_default(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }
}

/// `POST /create-payment-intent` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}
