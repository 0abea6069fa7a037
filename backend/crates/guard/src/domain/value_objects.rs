//! Domain Value Objects
//!
//! Immutable value types for the guard domain.

use std::fmt;

/// Set of origins allowed to send mutating requests
///
/// Entries are normalized (trimmed, lowercase, no trailing `/`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedOrigins(Vec<String>);

impl AllowedOrigins {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = Vec::new();
        for origin in origins {
            if let Some(origin) = normalize_origin(origin.as_ref()) {
                if !list.contains(&origin) {
                    list.push(origin);
                }
            }
        }
        Self(list)
    }

    /// Whether a request `Origin` header value is allowed
    ///
    /// The opaque origin `null` never matches.
    pub fn allows(&self, origin: &str) -> bool {
        match normalize_origin(origin) {
            Some(origin) => self.0.iter().any(|allowed| *allowed == origin),
            None => false,
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn normalize_origin(origin: &str) -> Option<String> {
    let origin = origin.trim().trim_end_matches('/');
    if origin.is_empty() || origin.eq_ignore_ascii_case("null") {
        return None;
    }
    Some(origin.to_ascii_lowercase())
}

/// Why a request failed CSRF validation
///
/// Only ever logged. Clients always see the same `CSRF_VALIDATION_FAILED`
/// response regardless of the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsrfRejection {
    MissingOrigin,
    OriginMismatch,
    MissingToken,
    TokenTooLong,
    MissingCookie,
    MalformedCookie,
    BadSignature,
    Expired,
    TokenMismatch,
}

impl CsrfRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            CsrfRejection::MissingOrigin => "missing_origin",
            CsrfRejection::OriginMismatch => "origin_mismatch",
            CsrfRejection::MissingToken => "missing_token",
            CsrfRejection::TokenTooLong => "token_too_long",
            CsrfRejection::MissingCookie => "missing_cookie",
            CsrfRejection::MalformedCookie => "malformed_cookie",
            CsrfRejection::BadSignature => "bad_signature",
            CsrfRejection::Expired => "expired",
            CsrfRejection::TokenMismatch => "token_mismatch",
        }
    }
}

impl fmt::Display for CsrfRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
