use axum::{Router, middleware};
use http::{Method, Uri};
use shared::error::{AppError, ErrorCode};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

use crate::core::ServerState;
use crate::server::middleware::{logging_middleware, rate_limit};

/// Build the API router (without state)
pub fn build_router() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::payments::router())
        .merge(crate::api::orders::router())
        .merge(crate::api::receipts::router())
}

/// Build the full application: API routes, SPA fallback and middleware
///
/// Unmatched paths are served from the static bundle directory with
/// `index.html` as the fallback. Without a bundle directory they get a JSON 404.
pub fn build_app(state: ServerState) -> Router {
    let static_dir = state.config.static_path();

    let router = if static_dir.is_dir() {
        tracing::info!(dir = %static_dir.display(), "Serving frontend bundle");
        let index = static_dir.join("index.html");
        build_router().fallback_service(ServeDir::new(&static_dir).fallback(ServeFile::new(index)))
    } else {
        tracing::warn!(
            dir = %static_dir.display(),
            "Frontend bundle directory not found, unmatched routes return 404"
        );
        build_router().fallback(not_found)
    };

    router
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                // HTTP 请求日志中间件 (最外层)
                .layer(middleware::from_fn(logging_middleware))
                // Tower HTTP 中间件
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
}

async fn not_found(method: Method, uri: Uri) -> AppError {
    AppError::with_message(ErrorCode::NotFound, "Route not found")
        .with_detail("path", uri.path())
        .with_detail("method", method.as_str())
}
