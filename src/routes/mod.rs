//! HTTP route table.
//!
//! Only `/health` is mounted. Unknown paths fall through to axum's default 404
//! and unsupported methods on known paths to its default 405.

pub mod health;

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CACHE_CONTROL_HEALTH, REQUEST_BODY_LIMIT};
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Health check - no caching, always fresh for liveness probes
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HEALTH),
        ));

    Router::new()
        .merge(health_routes)
        .with_state(state.clone())
        .layer(DefaultBodyLimit::max(REQUEST_BODY_LIMIT))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn_with_state(state, request_id_layer))
}
