//! Domain Entities
//!
//! Core entities of the request guard.

use platform::crypto::{random_bytes, to_base64url};

pub use platform::rate_limit::RateLimitCounter;

/// Random bytes per CSRF token
pub const CSRF_TOKEN_BYTES: usize = 32;

/// CSRF token - a random value bound to the client's signed cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken {
    /// base64url of [`CSRF_TOKEN_BYTES`] random bytes
    pub value: String,
    pub issued_at_ms: i64,
    pub expires_at_ms: i64,
}

impl CsrfToken {
    /// Generate a fresh token
    pub fn generate(ttl_ms: i64, now_ms: i64) -> Self {
        Self {
            value: to_base64url(&random_bytes(CSRF_TOKEN_BYTES)),
            issued_at_ms: now_ms,
            expires_at_ms: now_ms.saturating_add(ttl_ms),
        }
    }

    /// Check if the token has expired at `now_ms`
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at_ms
    }
}
