//! Contact Error Types
//!
//! Contact-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::validation::FieldErrors;
use thiserror::Error;

/// Contact-specific result type alias
pub type ContactResult<T> = Result<T, ContactError>;

pub const VALIDATION_MESSAGE: &str = "入力内容に誤りがあります";
pub const MALFORMED_BODY_MESSAGE: &str = "リクエストの形式が正しくありません";

/// Contact-specific error variants
#[derive(Debug, Error)]
pub enum ContactError {
    /// Form failed schema validation
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),

    /// Body is not a JSON contact form
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ContactError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ContactError::Validation(_) | ContactError::MalformedBody(_) => {
                StatusCode::BAD_REQUEST
            }
            ContactError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContactError::Validation(_) | ContactError::MalformedBody(_) => ErrorKind::BadRequest,
            ContactError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            ContactError::Validation(fields) => {
                AppError::validation(VALIDATION_MESSAGE, fields.clone())
            }
            ContactError::MalformedBody(_) => AppError::bad_request(MALFORMED_BODY_MESSAGE),
            ContactError::Internal(_) => AppError::internal("Internal server error"),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ContactError::Validation(fields) => {
                let fields: Vec<&str> = fields.keys().map(String::as_str).collect();
                tracing::debug!(?fields, "Contact form validation failed");
            }
            ContactError::MalformedBody(reason) => {
                tracing::debug!(reason = %reason, "Malformed contact request body");
            }
            ContactError::Internal(msg) => {
                tracing::error!(message = %msg, "Contact internal error");
            }
        }
    }
}

impl From<ContactError> for AppError {
    fn from(err: ContactError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
