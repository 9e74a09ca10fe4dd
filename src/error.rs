use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::ConfigError;
use crate::di::ContainerError;
use crate::http::ServerError;
use crate::middleware::RequestId;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dependency error: {0}")]
    Container(#[from] ContainerError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<String>,
}

/// Every variant is a wiring or startup defect from the client's point of view,
/// so the detail is logged and a generic 500 is returned.
fn internal_error(error: &AppError, request_id: Option<&RequestId>) -> Response {
    match request_id {
        Some(id) => tracing::error!(request_id = %id.0, error = %error, "Internal error"),
        None => tracing::error!(error = %error, "Internal error"),
    }

    let body = ErrorBody {
        error: "Internal server error",
        request_id: request_id.map(|id| id.0.to_string()),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        internal_error(&self, None)
    }
}

/// An [`AppError`] tagged with the request it happened in.
#[derive(Debug)]
pub struct AppErrorResponse {
    pub error: AppError,
    pub request_id: RequestId,
}

impl IntoResponse for AppErrorResponse {
    fn into_response(self) -> Response {
        internal_error(&self.error, Some(&self.request_id))
    }
}

pub trait ResultExt<T> {
    /// Attach the current request id to the error side.
    fn with_request_id(self, request_id: &RequestId) -> Result<T, AppErrorResponse>;
}

impl<T, E: Into<AppError>> ResultExt<T> for Result<T, E> {
    fn with_request_id(self, request_id: &RequestId) -> Result<T, AppErrorResponse> {
        self.map_err(|e| AppErrorResponse {
            error: e.into(),
            request_id: request_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::Token;
    use http_body_util::BodyExt;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_error_response_carries_request_id() {
        let request_id = RequestId(Uuid::new_v4());
        let result: Result<(), ContainerError> = Err(ContainerError::NotRegistered(Token::Config));

        let response = result.with_request_id(&request_id).unwrap_err().into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal server error");
        assert_eq!(json["request_id"], request_id.0.to_string());
    }

    #[tokio::test]
    async fn test_error_without_request_id() {
        let response = AppError::from(ContainerError::NotRegistered(Token::Logger)).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json.get("request_id").is_none());
    }
}
