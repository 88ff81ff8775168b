use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::models::Platform;

#[derive(Debug, Error)]
pub enum SocialAccountError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Session expired, please reconnect your account")]
    SessionExpired,

    #[error("Brand not found: {0}")]
    BrandNotFound(Uuid),

    #[error("Social account not found: {0}")]
    AccountNotFound(String),

    #[error("This {} account is already connected", .platform.label())]
    AlreadyConnected { platform: Platform, external_id: String },

    #[error("OAuth state belongs to {}, not {}", .expected.label(), .actual.label())]
    PlatformMismatch { expected: Platform, actual: Platform },

    /// Non-2xx or malformed answer from a platform API
    #[error("{platform} API error: {message}")]
    Upstream { platform: Platform, message: String },

    #[error("Authorization was not granted: {0}")]
    OAuthDenied(String),

    #[error("Credential encryption error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type SocialAccountResult<T> = Result<T, SocialAccountError>;

impl SocialAccountError {
    pub fn upstream(platform: Platform, message: impl Into<String>) -> Self {
        Self::Upstream {
            platform,
            message: message.into(),
        }
    }

    /// Text shown to the end user on the frontend error page
    pub fn user_message(&self) -> String {
        match self {
            Self::Upstream { message, .. } => message.clone(),
            Self::Crypto(_) | Self::Internal(_) => "Something went wrong, please try again".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<sea_orm::DbErr> for SocialAccountError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Internal(format!("Database error: {}", err))
    }
}

impl From<SocialAccountError> for AppError {
    fn from(err: SocialAccountError) -> Self {
        match err {
            SocialAccountError::Validation(msg) => AppError::BadRequest(msg),
            SocialAccountError::SessionExpired => AppError::SessionExpired,
            SocialAccountError::BrandNotFound(id) => {
                AppError::NotFound(format!("Brand {} not found", id))
            }
            SocialAccountError::AccountNotFound(id) => {
                AppError::NotFound(format!("Social account {} not found", id))
            }
            e @ SocialAccountError::AlreadyConnected { .. } => AppError::Conflict(e.to_string()),
            e @ SocialAccountError::PlatformMismatch { .. } => AppError::BadRequest(e.to_string()),
            SocialAccountError::Upstream { message, .. } => AppError::Upstream(message),
            e @ SocialAccountError::OAuthDenied(_) => AppError::BadRequest(e.to_string()),
            SocialAccountError::Crypto(msg) | SocialAccountError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for SocialAccountError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
