//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`payments`] - 支付意图
//! - [`orders`] - 订单创建与查询
//! - [`receipts`] - 收据邮件

pub mod health;
pub mod orders;
pub mod payments;
pub mod receipts;

use axum::Json;
use axum::extract::rejection::JsonRejection;

pub use crate::utils::{AppError, AppResult};

/// Unwrap a JSON body, reporting decode failures as validation errors
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(AppError::validation(rejection.body_text())
            .with_detail("status", rejection.status().as_u16())),
    }
}
