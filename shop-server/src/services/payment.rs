//! 支付网关抽象

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Invalid payment amount: {0}")]
    InvalidAmount(f64),

    #[error("Payment provider request failed: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Payment provider rejected the request: {0}")]
    Provider(String),
}

/// 第三方支付处理方
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// 创建支付意图，返回前端确认支付所需的 client secret
    ///
    /// `amount` 为货币单位 (非最小单位)，`currency` 为小写 ISO 代码。
    async fn create_payment_intent(&self, amount: f64, currency: &str)
    -> Result<String, PaymentError>;
}
