//! Order API Handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use shared::error::ErrorCode;
use shared::models::{CreateOrderRequest, Order};

use crate::api::{AppError, AppResult, json_body};
use crate::core::ServerState;
use crate::utils::validation::validate_order;

/// POST /orders - 校验并保存订单
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let new_order = validate_order(json_body(payload)?)?;

    let order = state.orders.add_order(new_order).await.map_err(|e| {
        tracing::error!(error = %e, "Error saving order");
        AppError::new(ErrorCode::OrderSaveFailed)
    })?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders - 获取全部订单
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders.list_orders().await.map_err(|e| {
        tracing::error!(error = %e, "Error reading orders");
        AppError::new(ErrorCode::OrderReadFailed)
    })?;
    Ok(Json(orders))
}

/// GET /orders/{id} - 获取单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.orders.find_order(&id).await.map_err(|e| {
        tracing::error!(error = %e, order_id = %id, "Error reading orders");
        AppError::new(ErrorCode::OrderReadFailed)
    })?;

    order
        .map(Json)
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("id", id))
}
