use axum::response::Response;

use super::{ErrorCode, ErrorResponse};

/// Router fallback for unknown paths
pub async fn not_found() -> Response {
    ErrorResponse::new(ErrorCode::NotFound, "The requested resource was not found")
        .into_response_with(ErrorCode::NotFound)
}
