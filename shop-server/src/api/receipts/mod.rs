//! 收据邮件路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /send-receipt | POST | 生成 PDF 收据并发送邮件 |

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::{Json, Router, routing::post};
use chrono::Utc;
use shared::error::{ApiResponse, ErrorCode};
use shared::models::ReceiptRequest;

use crate::api::{AppError, AppResult, json_body};
use crate::core::ServerState;
use crate::receipt::{RECEIPT_FILENAME, RECEIPT_SUBJECT, receipt_email_body, render_receipt};
use crate::services::Attachment;
use crate::utils::validation::validate_receipt;

pub fn router() -> Router<ServerState> {
    Router::new().route("/send-receipt", post(send_receipt))
}

async fn send_receipt(
    State(state): State<ServerState>,
    payload: Result<Json<ReceiptRequest>, JsonRejection>,
) -> AppResult<ApiResponse<()>> {
    let req = validate_receipt(json_body(payload)?)?;

    let pdf = render_receipt(&req.order_details, req.amount, Utc::now());
    let body = receipt_email_body(req.amount);

    state
        .mailer
        .send_receipt(
            &req.email,
            RECEIPT_SUBJECT,
            &body,
            Attachment::pdf(RECEIPT_FILENAME, pdf),
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Error sending receipt");
            AppError::new(ErrorCode::ReceiptSendFailed)
        })?;

    Ok(ApiResponse::message("Receipt sent successfully"))
}
