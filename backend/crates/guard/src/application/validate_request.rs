//! Validate Request Use Case
//!
//! CSRF validation for a single request: method, Origin, header token and
//! signed cookie.

use axum::http::{HeaderMap, Method, header};
use platform::cookie::extract_cookie;
use std::sync::Arc;

use crate::application::config::GuardConfig;
use crate::domain::services::{is_mutating, validate_token_pair};
use crate::domain::value_objects::CsrfRejection;
use crate::error::{GuardError, GuardResult};

/// Validate CSRF Use Case
pub struct ValidateCsrfUseCase {
    config: Arc<GuardConfig>,
}

impl ValidateCsrfUseCase {
    pub fn new(config: Arc<GuardConfig>) -> Self {
        Self { config }
    }

    /// Validate a request; `Ok` for safe methods and exempt paths
    pub fn validate(
        &self,
        method: &Method,
        path: &str,
        headers: &HeaderMap,
        now_ms: i64,
    ) -> GuardResult<()> {
        if !is_mutating(method) || self.config.csrf.is_exempt(path) {
            return Ok(());
        }

        match self.check(headers, now_ms) {
            Ok(()) => Ok(()),
            Err(reason) => {
                tracing::debug!(%method, path, reason = %reason, "CSRF rejection");
                Err(GuardError::CsrfValidationFailed)
            }
        }
    }

    /// Origin is checked first so a foreign origin fails regardless of the token
    fn check(&self, headers: &HeaderMap, now_ms: i64) -> Result<(), CsrfRejection> {
        let csrf = &self.config.csrf;

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|v| v.to_str().ok())
            .ok_or(CsrfRejection::MissingOrigin)?;
        if !csrf.allowed_origins.allows(origin) {
            return Err(CsrfRejection::OriginMismatch);
        }

        let header_token = headers
            .get(csrf.header_name.as_str())
            .and_then(|v| v.to_str().ok());
        let cookie = extract_cookie(headers, &csrf.cookie_name);

        validate_token_pair(
            header_token,
            cookie.as_deref(),
            &csrf.secret,
            csrf.token_ttl_ms(),
            now_ms,
        )
    }
}
