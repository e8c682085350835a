//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Receipt errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 on the wire so the frontend can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Client exceeded the request rate limit
    TooManyRequests = 9,

    // ==================== 4xxx: Order ====================
    OrderNotFound = 4001,
    OrderEmpty = 4007,
    OrderTooManyItems = 4008,
    OrderTotalMismatch = 4009,
    /// Order could not be persisted
    OrderSaveFailed = 4101,
    /// Orders could not be loaded
    OrderReadFailed = 4102,

    // ==================== 5xxx: Payment ====================
    PaymentFailed = 5001,
    PaymentInvalidAmount = 5002,
    PaymentInvalidMethod = 5003,
    PaymentInvalidCurrency = 5004,

    // ==================== 6xxx: Receipt ====================
    ReceiptSendFailed = 6002,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required fields are missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::TooManyRequests => {
                "Too many requests from this IP, please try again later."
            }

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must contain at least one item",
            ErrorCode::OrderTooManyItems => "Order contains too many items",
            ErrorCode::OrderTotalMismatch => "Order total does not match its items",
            ErrorCode::OrderSaveFailed => "Failed to save order. Please try again.",
            ErrorCode::OrderReadFailed => "Failed to retrieve orders.",

            // Payment
            ErrorCode::PaymentFailed => "Payment processing failed. Please try again.",
            ErrorCode::PaymentInvalidAmount => {
                "Amount must be a positive number between 1 and 1,000,000"
            }
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",
            ErrorCode::PaymentInvalidCurrency => "Currency must be a 3-letter code",

            // Receipt
            ErrorCode::ReceiptSendFailed => "Failed to send receipt",

            // System
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when a u16 does not map to a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::TooManyRequests),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4007 => Ok(ErrorCode::OrderEmpty),
            4008 => Ok(ErrorCode::OrderTooManyItems),
            4009 => Ok(ErrorCode::OrderTotalMismatch),
            4101 => Ok(ErrorCode::OrderSaveFailed),
            4102 => Ok(ErrorCode::OrderReadFailed),

            // Payment
            5001 => Ok(ErrorCode::PaymentFailed),
            5002 => Ok(ErrorCode::PaymentInvalidAmount),
            5003 => Ok(ErrorCode::PaymentInvalidMethod),
            5004 => Ok(ErrorCode::PaymentInvalidCurrency),

            // Receipt
            6002 => Ok(ErrorCode::ReceiptSendFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::TooManyRequests.code(), 9);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::OrderSaveFailed.code(), 4101);
        assert_eq!(ErrorCode::PaymentFailed.code(), 5001);
        assert_eq!(ErrorCode::ReceiptSendFailed.code(), 6002);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::ValidationFailed.is_success());
        assert!(!ErrorCode::OrderReadFailed.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(4102), Ok(ErrorCode::OrderReadFailed));
        assert_eq!(ErrorCode::try_from(5004), Ok(ErrorCode::PaymentInvalidCurrency));
        assert_eq!(ErrorCode::try_from(9001), Ok(ErrorCode::InternalError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(4000), Err(InvalidErrorCode(4000)));
        assert_eq!(ErrorCode::try_from(65535), Err(InvalidErrorCode(65535)));
        // 未分配的号段
        for unassigned in [1, 4, 6001, 9002, 9404] {
            assert_eq!(
                ErrorCode::try_from(unassigned),
                Err(InvalidErrorCode(unassigned))
            );
        }
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::OrderSaveFailed).unwrap();
        assert_eq!(json, "4101");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("5001").unwrap();
        assert_eq!(code, ErrorCode::PaymentFailed);
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("12345");
        assert!(result.is_err());
    }

    #[test]
    fn test_message() {
        assert_eq!(
            ErrorCode::OrderSaveFailed.message(),
            "Failed to save order. Please try again."
        );
        assert_eq!(ErrorCode::OrderReadFailed.message(), "Failed to retrieve orders.");
        assert_eq!(ErrorCode::ReceiptSendFailed.message(), "Failed to send receipt");
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::OrderNotFound), "4001");
    }
}
