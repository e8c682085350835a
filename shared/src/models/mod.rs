//! Data models
//!
//! Shared between shop-server and the storefront frontend (via API).
//! Wire format is camelCase JSON.

pub mod order;
pub mod payment;
pub mod receipt;

// Re-exports
pub use order::*;
pub use payment::*;
pub use receipt::*;
