//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment method chosen at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Upi,
    Demo,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [Self::Card, Self::Upi, Self::Demo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Upi => "upi",
            Self::Demo => "demo",
        }
    }

    /// Parse the wire name (exact match, as sent by the checkout page)
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == value)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        Self::Pending,
        Self::Paid,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer contact and shipping details
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

/// Order line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Catalog product id
    pub id: u64,
    pub name: String,
    /// Unit price in currency unit
    pub price: f64,
    pub quantity: u32,
}

impl OrderItem {
    /// Line amount (price × quantity), unrounded
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// `POST /orders` request body
///
/// Enumerations arrive as plain strings so that unknown values are reported
/// by request validation rather than as JSON decoding failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub payment_method: String,
    pub status: String,
}

/// Order input before the store assigns `id` and `date`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    /// Total in currency unit
    pub total: f64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
}

impl NewOrder {
    /// Attach the store-assigned identity fields
    pub fn into_order(self, id: String, date: DateTime<Utc>) -> Order {
        Order {
            id,
            date,
            customer: self.customer,
            items: self.items,
            total: self.total,
            payment_method: self.payment_method,
            status: self.status,
        }
    }
}

/// Persisted order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// `ORD-<millis>-<suffix>`, never reassigned
    pub id: String,
    pub date: DateTime<Utc>,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_new_order() -> NewOrder {
        NewOrder {
            customer: Customer {
                name: "Raju Kumar".to_string(),
                email: "raju@example.com".to_string(),
                address: Some("12 MG Road".to_string()),
                city: Some("Hyderabad".to_string()),
                zip: None,
            },
            items: vec![OrderItem {
                id: 1,
                name: "Wild Forest Honey (500g)".to_string(),
                price: 650.0,
                quantity: 2,
            }],
            total: 1300.0,
            payment_method: PaymentMethod::Upi,
            status: OrderStatus::Paid,
        }
    }

    #[test]
    fn test_order_wire_format_is_camel_case() {
        let order = sample_new_order().into_order("ORD-1-abc".to_string(), Utc::now());
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["id"], "ORD-1-abc");
        assert_eq!(json["paymentMethod"], "upi");
        assert_eq!(json["status"], "Paid");
        assert_eq!(json["customer"]["city"], "Hyderabad");
        assert!(json["customer"].get("zip").is_none());
        assert_eq!(json["items"][0]["quantity"], 2);
    }

    #[test]
    fn test_new_order_deserializes_from_checkout_payload() {
        let payload = serde_json::json!({
            "customer": { "name": "Priya", "email": "priya@example.com" },
            "items": [{ "id": 3, "name": "Groundnut Oil", "price": 360, "quantity": 1 }],
            "total": 360,
            "paymentMethod": "card",
            "status": "Pending"
        });
        let order: NewOrder = serde_json::from_value(payload).unwrap();

        assert_eq!(order.payment_method, PaymentMethod::Card);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items[0].price, 360.0);
        assert!(order.customer.address.is_none());
    }

    #[test]
    fn test_unknown_payment_method_is_rejected() {
        let result: Result<PaymentMethod, _> = serde_json::from_str("\"cash\"");
        assert!(result.is_err());
        assert_eq!(PaymentMethod::parse("demo"), Some(PaymentMethod::Demo));
        assert_eq!(PaymentMethod::parse("Card"), None);
    }

    #[test]
    fn test_create_order_request_keeps_raw_enum_strings() {
        let payload = serde_json::json!({
            "customer": { "name": "Priya", "email": "priya@example.com" },
            "items": [],
            "total": 0,
            "paymentMethod": "cash",
            "status": "Lost"
        });
        let req: CreateOrderRequest = serde_json::from_value(payload).unwrap();

        assert_eq!(req.payment_method, "cash");
        assert_eq!(req.status, "Lost");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(OrderStatus::parse("Shipped"), Some(OrderStatus::Shipped));
        assert_eq!(OrderStatus::parse("shipped"), None);
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_into_order_keeps_input_fields() {
        let input = sample_new_order();
        let date = Utc::now();
        let order = input.clone().into_order("ORD-42-xyz".to_string(), date);

        assert_eq!(order.id, "ORD-42-xyz");
        assert_eq!(order.date, date);
        assert_eq!(order.customer, input.customer);
        assert_eq!(order.items, input.items);
        assert_eq!(order.items[0].line_total(), 1300.0);
    }
}
