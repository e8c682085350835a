//! 订单路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /orders | POST | 创建订单 (201) |
//! | /orders | GET | 全部订单 |
//! | /orders/{id} | GET | 单个订单 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/orders", get(handler::list).post(handler::create))
        .route("/orders/{id}", get(handler::get_by_id))
}
