//! Input validation helpers
//!
//! Request bodies are checked here before they reach the order store, the
//! payment gateway or the mailer. Order and receipt validation collect every
//! field error; the response carries them under `details.errors`.

use serde::Serialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    CreateOrderRequest, Customer, DEFAULT_CURRENCY, NewOrder, OrderItem, OrderStatus,
    PaymentIntentRequest, PaymentMethod, ReceiptLine, ReceiptRequest,
};

use crate::orders::money::{items_total, totals_match};

// ── Limits ──────────────────────────────────────────────────────────

/// Payment and order amounts (currency unit)
pub const MIN_AMOUNT: f64 = 1.0;
pub const MAX_AMOUNT: f64 = 1_000_000.0;

pub const MAX_ORDER_ITEMS: usize = 50;
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_ADDRESS_LEN: usize = 500;
pub const MAX_CITY_LEN: usize = 100;
pub const MAX_ZIP_LEN: usize = 20;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

const INVALID_ORDER: &str = "Invalid order data. Please check all required fields.";
const INVALID_RECEIPT: &str = "Invalid receipt data. Please check all required fields.";
const INVALID_EMAIL: &str = "Please provide a valid email address";

// ── Field checks ────────────────────────────────────────────────────

/// `local@domain.tld`: no whitespace, one `@`, a dot inside the domain
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Trimmed, lowercase
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Finite and within [`MIN_AMOUNT`, `MAX_AMOUNT`]
pub fn is_valid_amount(value: f64) -> bool {
    value.is_finite() && (MIN_AMOUNT..=MAX_AMOUNT).contains(&value)
}

/// Exactly three ASCII letters; returns the lowercase code
pub fn normalize_currency(value: &str) -> Option<String> {
    let value = value.trim();
    (value.len() == 3 && value.bytes().all(|b| b.is_ascii_alphabetic()))
        .then(|| value.to_ascii_lowercase())
}

// ── Error collection ────────────────────────────────────────────────

/// One rejected field
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub code: ErrorCode,
    pub message: String,
}

/// Collects field errors across a request body
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: impl Into<String>, code: ErrorCode, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            code,
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Non-empty after trimming and at most `max_len` characters; returns the trimmed text
    pub fn required_text(
        &mut self,
        value: &str,
        field: &str,
        label: &str,
        max_len: usize,
    ) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.error(field, ErrorCode::RequiredField, format!("{label} is required"));
        } else if trimmed.chars().count() > max_len {
            self.error(
                field,
                ErrorCode::ValueOutOfRange,
                format!("{label} must be less than {max_len} characters"),
            );
        }
        trimmed.to_string()
    }

    /// Trimmed; empty becomes `None`
    pub fn optional_text(
        &mut self,
        value: Option<&str>,
        field: &str,
        label: &str,
        max_len: usize,
    ) -> Option<String> {
        let trimmed = value.map(str::trim).filter(|v| !v.is_empty())?;
        if trimmed.chars().count() > max_len {
            self.error(
                field,
                ErrorCode::ValueOutOfRange,
                format!("{label} must be less than {max_len} characters"),
            );
        }
        Some(trimmed.to_string())
    }

    /// Required, well-formed; returns the normalized address
    pub fn email(&mut self, value: &str, field: &str) -> String {
        let normalized = normalize_email(value);
        if normalized.is_empty() {
            self.error(field, ErrorCode::RequiredField, "Email is required");
        } else if normalized.len() > MAX_EMAIL_LEN || !is_valid_email(&normalized) {
            self.error(field, ErrorCode::InvalidFormat, INVALID_EMAIL);
        }
        normalized
    }

    /// Fails with the first error's code, `message` and all errors in `details.errors`
    pub fn finish(self, message: &str) -> AppResult<()> {
        let Some(first) = self.errors.first() else {
            return Ok(());
        };
        let code = first.code;
        let details = serde_json::to_value(&self.errors).unwrap_or_default();
        Err(AppError::with_message(code, message).with_detail("errors", details))
    }
}

// ── Request validation ──────────────────────────────────────────────

/// Validated payment intent parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntentParams {
    pub amount: f64,
    pub currency: String,
}

pub fn validate_payment_intent(req: &PaymentIntentRequest) -> AppResult<PaymentIntentParams> {
    if !is_valid_amount(req.amount) {
        return Err(AppError::new(ErrorCode::PaymentInvalidAmount).with_detail("field", "amount"));
    }

    let currency = match req.currency.as_deref() {
        None => DEFAULT_CURRENCY.to_string(),
        Some(value) => normalize_currency(value).ok_or_else(|| {
            AppError::new(ErrorCode::PaymentInvalidCurrency).with_detail("field", "currency")
        })?,
    };

    Ok(PaymentIntentParams {
        amount: req.amount,
        currency,
    })
}

/// Validate `POST /orders` and build the store input
pub fn validate_order(req: CreateOrderRequest) -> AppResult<NewOrder> {
    let mut v = Validator::new();

    let customer = Customer {
        name: v.required_text(
            &req.customer.name,
            "customer.name",
            "Customer name",
            MAX_NAME_LEN,
        ),
        email: v.email(&req.customer.email, "customer.email"),
        address: v.optional_text(
            req.customer.address.as_deref(),
            "customer.address",
            "Address",
            MAX_ADDRESS_LEN,
        ),
        city: v.optional_text(
            req.customer.city.as_deref(),
            "customer.city",
            "City name",
            MAX_CITY_LEN,
        ),
        zip: v.optional_text(
            req.customer.zip.as_deref(),
            "customer.zip",
            "ZIP code",
            MAX_ZIP_LEN,
        ),
    };

    if req.items.is_empty() {
        v.error("items", ErrorCode::OrderEmpty, "Order must contain at least one item");
    } else if req.items.len() > MAX_ORDER_ITEMS {
        v.error(
            "items",
            ErrorCode::OrderTooManyItems,
            format!("Order cannot contain more than {MAX_ORDER_ITEMS} items"),
        );
    }

    let mut items = Vec::with_capacity(req.items.len());
    for (i, item) in req.items.into_iter().enumerate() {
        let name = v.required_text(
            &item.name,
            &format!("items[{i}].name"),
            "Item name",
            usize::MAX,
        );
        if !(item.price.is_finite() && item.price > 0.0) {
            v.error(
                format!("items[{i}].price"),
                ErrorCode::ValueOutOfRange,
                "Item price must be positive",
            );
        }
        if item.quantity < 1 {
            v.error(
                format!("items[{i}].quantity"),
                ErrorCode::ValueOutOfRange,
                "Item quantity must be at least 1",
            );
        }
        items.push(OrderItem { name, ..item });
    }

    if !is_valid_amount(req.total) {
        v.error(
            "total",
            ErrorCode::PaymentInvalidAmount,
            ErrorCode::PaymentInvalidAmount.message(),
        );
    } else if !v.has_errors() && !totals_match(req.total, items_total(&items)) {
        v.error(
            "total",
            ErrorCode::OrderTotalMismatch,
            format!(
                "Order total {} does not match items total {}",
                req.total,
                items_total(&items)
            ),
        );
    }

    let payment_method = PaymentMethod::parse(req.payment_method.trim());
    if payment_method.is_none() {
        v.error("paymentMethod", ErrorCode::PaymentInvalidMethod, "Invalid payment method");
    }

    let status = OrderStatus::parse(req.status.trim());
    if status.is_none() {
        v.error("status", ErrorCode::InvalidRequest, "Invalid order status");
    }

    v.finish(INVALID_ORDER)?;

    match (payment_method, status) {
        (Some(payment_method), Some(status)) => Ok(NewOrder {
            customer,
            items,
            total: req.total,
            payment_method,
            status,
        }),
        _ => Err(AppError::validation(INVALID_ORDER)),
    }
}

/// Validate `POST /send-receipt`; returns the request with a normalized email
pub fn validate_receipt(req: ReceiptRequest) -> AppResult<ReceiptRequest> {
    let mut v = Validator::new();

    let email = v.email(&req.email, "email");

    if req.order_details.is_empty() || req.order_details.len() > MAX_ORDER_ITEMS {
        v.error(
            "orderDetails",
            ErrorCode::ValueOutOfRange,
            format!("Order details must contain between 1 and {MAX_ORDER_ITEMS} items"),
        );
    }

    let mut order_details = Vec::with_capacity(req.order_details.len());
    for (i, line) in req.order_details.into_iter().enumerate() {
        let name = v.required_text(
            &line.name,
            &format!("orderDetails[{i}].name"),
            "Item name",
            usize::MAX,
        );
        if line.quantity < 1 {
            v.error(
                format!("orderDetails[{i}].quantity"),
                ErrorCode::ValueOutOfRange,
                "Item quantity must be at least 1",
            );
        }
        if !(line.price.is_finite() && line.price >= 0.0) {
            v.error(
                format!("orderDetails[{i}].price"),
                ErrorCode::ValueOutOfRange,
                "Item price must be a non-negative number",
            );
        }
        order_details.push(ReceiptLine { name, ..line });
    }

    if !(req.amount.is_finite() && req.amount > 0.0) {
        v.error("amount", ErrorCode::ValueOutOfRange, "Amount must be a positive number");
    }

    v.finish(INVALID_RECEIPT)?;

    Ok(ReceiptRequest {
        email,
        order_details,
        amount: req.amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_request() -> CreateOrderRequest {
        CreateOrderRequest {
            customer: Customer {
                name: "  Meera Iyer ".to_string(),
                email: " Meera@Example.COM ".to_string(),
                address: Some("  ".to_string()),
                city: Some(" Chennai ".to_string()),
                zip: None,
            },
            items: vec![
                OrderItem {
                    id: 1,
                    name: "Honey".to_string(),
                    price: 650.0,
                    quantity: 1,
                },
                OrderItem {
                    id: 4,
                    name: "Millet Flour".to_string(),
                    price: 90.5,
                    quantity: 2,
                },
            ],
            total: 831.0,
            payment_method: "upi".to_string(),
            status: "Paid".to_string(),
        }
    }

    fn error_fields(err: &AppError) -> Vec<String> {
        err.details.as_ref().unwrap()["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_email_rules() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.example.in"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@com."));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("a b@c.co"));
        assert_eq!(normalize_email("  X@Y.Co "), "x@y.co");
    }

    #[test]
    fn test_amount_and_currency_rules() {
        assert!(is_valid_amount(1.0));
        assert!(is_valid_amount(1_000_000.0));
        assert!(!is_valid_amount(0.5));
        assert!(!is_valid_amount(1_000_000.01));
        assert!(!is_valid_amount(f64::NAN));

        assert_eq!(normalize_currency("INR"), Some("inr".to_string()));
        assert_eq!(normalize_currency("usd"), Some("usd".to_string()));
        assert_eq!(normalize_currency("us"), None);
        assert_eq!(normalize_currency("u5d"), None);
    }

    #[test]
    fn test_payment_intent_defaults_currency() {
        let params = validate_payment_intent(&PaymentIntentRequest {
            amount: 650.0,
            currency: None,
        })
        .unwrap();
        assert_eq!(params.currency, "inr");

        let err = validate_payment_intent(&PaymentIntentRequest {
            amount: 0.0,
            currency: None,
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentInvalidAmount);

        let err = validate_payment_intent(&PaymentIntentRequest {
            amount: 10.0,
            currency: Some("rupee".to_string()),
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentInvalidCurrency);
    }

    #[test]
    fn test_valid_order_is_normalized() {
        let order = validate_order(order_request()).unwrap();

        assert_eq!(order.customer.name, "Meera Iyer");
        assert_eq!(order.customer.email, "meera@example.com");
        assert_eq!(order.customer.address, None);
        assert_eq!(order.customer.city.as_deref(), Some("Chennai"));
        assert_eq!(order.payment_method, PaymentMethod::Upi);
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.items.len(), 2);
    }

    #[test]
    fn test_total_within_tolerance_is_accepted() {
        let mut req = order_request();
        req.total = 831.01;
        assert!(validate_order(req).is_ok());

        let mut req = order_request();
        req.total = 832.0;
        let err = validate_order(req).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderTotalMismatch);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unknown_enums_are_validation_errors() {
        let mut req = order_request();
        req.payment_method = "cash".to_string();
        req.status = "Lost".to_string();

        let err = validate_order(req).unwrap_err();
        assert_eq!(err.message, INVALID_ORDER);
        assert_eq!(error_fields(&err), vec!["paymentMethod", "status"]);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_all_field_errors_are_reported() {
        let mut req = order_request();
        req.customer.name = " ".to_string();
        req.customer.email = "not-an-email".to_string();
        req.customer.zip = Some("1".repeat(21));
        req.items[1].quantity = 0;
        req.items[0].price = -1.0;

        let err = validate_order(req).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(
            error_fields(&err),
            vec![
                "customer.name",
                "customer.email",
                "customer.zip",
                "items[0].price",
                "items[1].quantity",
            ]
        );
    }

    #[test]
    fn test_item_count_limits() {
        let mut req = order_request();
        req.items.clear();
        req.total = 10.0;
        assert_eq!(validate_order(req).unwrap_err().code, ErrorCode::OrderEmpty);

        let mut req = order_request();
        req.items = (0..51)
            .map(|i| OrderItem {
                id: i,
                name: format!("Item {i}"),
                price: 1.0,
                quantity: 1,
            })
            .collect();
        req.total = 51.0;
        assert_eq!(validate_order(req).unwrap_err().code, ErrorCode::OrderTooManyItems);
    }

    #[test]
    fn test_receipt_validation() {
        let ok = validate_receipt(ReceiptRequest {
            email: " Buyer@Example.com".to_string(),
            order_details: vec![ReceiptLine {
                name: "Honey".to_string(),
                quantity: 1,
                price: 650.0,
            }],
            amount: 650.0,
        })
        .unwrap();
        assert_eq!(ok.email, "buyer@example.com");

        let err = validate_receipt(ReceiptRequest {
            email: "buyer".to_string(),
            order_details: vec![],
            amount: 0.0,
        })
        .unwrap_err();
        assert_eq!(error_fields(&err), vec!["email", "orderDetails", "amount"]);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    }
}
