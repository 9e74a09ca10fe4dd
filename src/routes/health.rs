//! Health check endpoint for container orchestration.
//!
//! A liveness probe: it reports that the process is accepting connections and
//! does not probe any downstream dependency.

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use tracing::instrument;

use crate::config::AppConfig;
use crate::di::Token;
use crate::error::{AppErrorResponse, ResultExt};
use crate::health::HealthStatus;
use crate::logging::Logger;
use crate::middleware::RequestId;
use crate::state::AppState;

/// Health check handler.
#[instrument(name = "health::health", skip(state, request_id))]
pub async fn health(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Json<HealthStatus>, AppErrorResponse> {
    let logger: Arc<Logger> = state
        .container
        .resolve(Token::Logger)
        .with_request_id(&request_id)?;
    let config: Arc<AppConfig> = state
        .container
        .resolve(Token::Config)
        .with_request_id(&request_id)?;

    let payload = HealthStatus::ok(&config);

    logger.in_scope(|| {
        tracing::info!(
            env = %config.environment,
            service = %config.service_name,
            request_id = %request_id.0,
            "Health check"
        )
    });

    Ok(Json(payload))
}
