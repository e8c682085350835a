//! 支付意图路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /create-payment-intent | POST | 创建支付意图，返回 clientSecret |

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::{Json, Router, routing::post};
use shared::error::ErrorCode;
use shared::models::{PaymentIntentRequest, PaymentIntentResponse};

use crate::api::{AppError, AppResult, json_body};
use crate::core::ServerState;
use crate::utils::validation::validate_payment_intent;

pub fn router() -> Router<ServerState> {
    Router::new().route("/create-payment-intent", post(create_payment_intent))
}

async fn create_payment_intent(
    State(state): State<ServerState>,
    payload: Result<Json<PaymentIntentRequest>, JsonRejection>,
) -> AppResult<Json<PaymentIntentResponse>> {
    let req = json_body(payload)?;
    let params = validate_payment_intent(&req)?;

    let client_secret = state
        .payments
        .create_payment_intent(params.amount, &params.currency)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, amount = params.amount, "Error creating payment intent");
            AppError::new(ErrorCode::PaymentFailed)
        })?;

    Ok(Json(PaymentIntentResponse { client_secret }))
}
