//! HTTP 中间件

pub mod logging;
pub mod rate_limit;

pub use logging::logging_middleware;
pub use rate_limit::{RateLimiter, rate_limit};
