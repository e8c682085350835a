//! 服务模块
//!
//! - [`https`] - 路由与中间件装配
//! - [`payment`] / [`stripe`] - 支付网关
//! - [`email`] - 收据邮件

pub mod email;
pub mod https;
pub mod payment;
pub mod stripe;

pub use email::{Attachment, LogMailer, MailError, ReceiptMailer, SesMailer};
pub use payment::{PaymentError, PaymentGateway};
pub use stripe::StripeGateway;
