//! Client Error Types
//!
//! Failures of the HTTP client that are not a server envelope. The state
//! machine turns any of these into an `UNEXPECTED_ERROR` result.

use kernel::error::kind::ErrorKind;
use thiserror::Error;

/// Client result type alias
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error variants
#[derive(Debug, Error)]
pub enum ClientError {
    /// Invalid base URL or client construction failure
    #[error("Invalid client configuration: {0}")]
    Config(String),

    /// Transport failure (connect, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body is not the JSON envelope
    #[error("Unexpected response (status {status})")]
    UnexpectedResponse { status: u16 },

    /// Token endpoint answered without a usable token
    #[error("CSRF token unavailable (status {status})")]
    TokenUnavailable { status: u16 },
}

impl ClientError {
    /// HTTP status code equivalent of this error
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Http(_) => ErrorKind::ServiceUnavailable,
            ClientError::Config(_)
            | ClientError::UnexpectedResponse { .. }
            | ClientError::TokenUnavailable { .. } => ErrorKind::InternalServerError,
        }
    }
}
