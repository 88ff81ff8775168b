use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_helpers::AppError;
use uuid::Uuid;

use crate::models::CallerContext;

pub const WORKSPACE_HEADER: &str = "x-workspace-id";
pub const USER_HEADER: &str = "x-user-id";

fn header_uuid(parts: &Parts, name: &str) -> Result<Uuid, AppError> {
    let raw = parts
        .headers
        .get(name)
        .ok_or_else(|| AppError::BadRequest(format!("Missing {} header", name)))?;

    raw.to_str()
        .ok()
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or_else(|| AppError::BadRequest(format!("Invalid {} header", name)))
}

/// Caller identity set by the upstream gateway
impl<S: Send + Sync> FromRequestParts<S> for CallerContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            workspace_id: header_uuid(parts, WORKSPACE_HEADER)?,
            user_id: header_uuid(parts, USER_HEADER)?,
        })
    }
}
