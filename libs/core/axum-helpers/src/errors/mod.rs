pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body of every failed response.
///
/// ```json
/// {
///   "success": false,
///   "error": { "code": "SESSION_EXPIRED", "message": "Session expired, please reconnect your account" }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    /// Field-level validation errors, when there are any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorBody {
                code,
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = Some(details);
        self
    }

    pub fn into_response_with(self, code: ErrorCode) -> Response {
        (code.status(), Json(self)).into_response()
    }
}

/// Application error rendered into the failure envelope.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryRejection(#[from] QueryRejection),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Session expired")]
    SessionExpired,

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Platform error message, shown to the client as-is
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::ValidationError(_)
            | AppError::JsonExtractorRejection(_)
            | AppError::QueryRejection(_)
            | AppError::BadRequest(_) => ErrorCode::ValidationError,
            AppError::SessionExpired => ErrorCode::SessionExpired,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::Upstream(_) => ErrorCode::UpstreamError,
            AppError::Database(_) | AppError::InternalServerError(_) => ErrorCode::InternalError,
            AppError::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();

        let body = match self {
            AppError::ValidationError(e) => {
                tracing::info!(error_code = %code, "Validation error: {}", e);
                ErrorResponse::new(code, code.default_message())
                    .with_details(serde_json::to_value(&e).unwrap_or(serde_json::Value::Null))
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::info!(error_code = %code, "JSON extraction error: {}", e);
                ErrorResponse::new(code, e.body_text())
            }
            AppError::QueryRejection(e) => {
                tracing::info!(error_code = %code, "Query extraction error: {}", e);
                ErrorResponse::new(code, e.body_text())
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = %code, "Bad request: {}", msg);
                ErrorResponse::new(code, msg)
            }
            AppError::SessionExpired => {
                tracing::info!(error_code = %code, "OAuth session missing or expired");
                ErrorResponse::new(code, code.default_message())
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = %code, "Not found: {}", msg);
                ErrorResponse::new(code, msg)
            }
            AppError::Conflict(msg) => {
                tracing::info!(error_code = %code, "Conflict: {}", msg);
                ErrorResponse::new(code, msg)
            }
            AppError::Upstream(msg) => {
                tracing::warn!(error_code = %code, "Upstream platform error: {}", msg);
                ErrorResponse::new(code, msg)
            }
            AppError::Database(e) => {
                tracing::error!(error_code = %code, "Database error: {:?}", e);
                ErrorResponse::new(code, code.default_message())
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = %code, "Internal server error: {}", msg);
                ErrorResponse::new(code, code.default_message())
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(error_code = %code, "Service unavailable: {}", msg);
                ErrorResponse::new(code, msg)
            }
        };

        body.into_response_with(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;

    async fn render(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_session_expired_envelope() {
        let (status, body) = render(AppError::SessionExpired).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "SESSION_EXPIRED");
        assert_eq!(
            body["error"]["message"],
            "Session expired, please reconnect your account"
        );
        assert!(body["error"].get("details").is_none());
    }

    #[tokio::test]
    async fn test_upstream_message_passthrough() {
        let (status, body) = render(AppError::Upstream("Invalid OAuth access token".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
        assert_eq!(body["error"]["message"], "Invalid OAuth access token");
    }

    #[tokio::test]
    async fn test_internal_error_hides_message() {
        let (status, body) = render(AppError::InternalServerError("key mismatch".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"]["message"], "An internal server error occurred");
    }

    #[tokio::test]
    async fn test_conflict_and_not_found() {
        let (status, body) = render(AppError::Conflict("already connected".into())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");

        let (status, body) = render(AppError::NotFound("brand".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
