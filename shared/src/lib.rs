//! Shared types for the Organic Shop backend
//!
//! Domain models, the unified error system and small utilities used by
//! `shop-server` and its tests.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{
    CreateOrderRequest, Customer, NewOrder, Order, OrderItem, OrderStatus, PaymentIntentRequest,
    PaymentIntentResponse, PaymentMethod, ReceiptLine, ReceiptRequest,
};
