use apimount::{ConfigLoadError, PlanError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use document::DocumentError;
use resolver::{ResolveError, ScanError};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Not found")]
    NotFound,

    #[error("Document resolution failed: {0}")]
    Resolution(#[from] ResolveError),

    #[error("Document rendering failed: {0}")]
    Render(#[from] DocumentError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Resolution(_)
            | ServerError::Render(_)
            | ServerError::Config(_)
            | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::Unauthorized(_) => "AUTH_FAILED",
            ServerError::NotFound => "NOT_FOUND",
            ServerError::Resolution(_) => "RESOLUTION_ERROR",
            ServerError::Render(_) => "RENDER_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        }

        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

impl From<ConfigLoadError> for ServerError {
    fn from(err: ConfigLoadError) -> Self {
        ServerError::Config(err.to_string())
    }
}

impl From<PlanError> for ServerError {
    fn from(err: PlanError) -> Self {
        ServerError::Config(err.to_string())
    }
}

impl From<ScanError> for ServerError {
    fn from(err: ScanError) -> Self {
        ServerError::Config(format!("Resource registry: {err}"))
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServerError::Internal(format!("Resolver task failed: {err}"))
    }
}
