//! Guard Error Types
//!
//! Guard-specific error variants that integrate with the unified
//! `kernel::error::AppError` system and render as the JSON envelope.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, code::ErrorCode, kind::ErrorKind};
use thiserror::Error;

/// Guard-specific result type alias
pub type GuardResult<T> = Result<T, GuardError>;

pub const CSRF_FAILED_MESSAGE: &str = "CSRF token validation failed";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please try again later.";

/// Guard-specific error variants
#[derive(Debug, Error)]
pub enum GuardError {
    /// Any failed CSRF check (token or Origin). The response is identical
    /// whichever check failed.
    #[error("CSRF validation failed")]
    CsrfValidationFailed,

    /// Too many requests in the current window
    #[error("Rate limit exceeded (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    /// Database error (shared counter store)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GuardError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GuardError::CsrfValidationFailed => StatusCode::FORBIDDEN,
            GuardError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            GuardError::Database(_) | GuardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GuardError::CsrfValidationFailed => ErrorKind::Forbidden,
            GuardError::RateLimited { .. } => ErrorKind::TooManyRequests,
            GuardError::Database(_) | GuardError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            GuardError::CsrfValidationFailed => AppError::forbidden(CSRF_FAILED_MESSAGE)
                .with_code(ErrorCode::CsrfValidationFailed)
                .with_action("Fetch a new CSRF token and retry"),
            GuardError::RateLimited { retry_after_secs } => {
                AppError::too_many_requests(RATE_LIMITED_MESSAGE)
                    .with_code(ErrorCode::RateLimited)
                    .with_retry_after(*retry_after_secs)
            }
            // Details stay in the logs
            GuardError::Database(_) | GuardError::Internal(_) => {
                AppError::internal("Internal server error")
            }
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            GuardError::Database(e) => {
                tracing::error!(error = %e, "Guard database error");
            }
            GuardError::Internal(msg) => {
                tracing::error!(message = %msg, "Guard internal error");
            }
            GuardError::RateLimited { retry_after_secs } => {
                tracing::warn!(retry_after_secs, "Rate limit exceeded");
            }
            GuardError::CsrfValidationFailed => {
                tracing::warn!("CSRF validation failed");
            }
        }
    }
}

impl From<GuardError> for AppError {
    fn from(err: GuardError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        self.log();
        let retry_after = match &self {
            GuardError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        };
        let mut response = self.to_app_error().into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, secs.into());
        }
        response
    }
}
