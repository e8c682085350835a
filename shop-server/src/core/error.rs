use thiserror::Error;

use crate::orders::StoreError;
use crate::services::PaymentError;

/// 服务器启动与运行错误
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("订单存储初始化失败: {0}")]
    Store(#[from] StoreError),

    #[error("支付网关初始化失败: {0}")]
    Payment(#[from] PaymentError),

    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
