//! Domain Services
//!
//! Pure CSRF token logic: cookie signing, cookie verification and
//! constant-time token comparison.
//!
//! Cookie value format: `<token>.<issued_at_ms>.<mac>` where `mac` is the
//! base64url HMAC-SHA256 of `<token>.<issued_at_ms>` under the server secret.

use axum::http::Method;
use platform::crypto::{
    constant_time_eq, from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256,
};

use crate::domain::entities::CsrfToken;
use crate::domain::value_objects::CsrfRejection;

/// Longest `x-csrf-token` header value considered at all
pub const MAX_HEADER_TOKEN_LEN: usize = 128;

/// Longest CSRF cookie value considered at all
pub const MAX_COOKIE_LEN: usize = 256;

/// Methods that change state and therefore require CSRF validation
pub fn is_mutating(method: &Method) -> bool {
    method == Method::POST
        || method == Method::PUT
        || method == Method::PATCH
        || method == Method::DELETE
}

/// Build the signed cookie value for a token
pub fn sign_token(token: &CsrfToken, secret: &[u8; 32]) -> String {
    let payload = format!("{}.{}", token.value, token.issued_at_ms);
    let mac = hmac_sha256(secret, payload.as_bytes());
    format!("{}.{}", payload, to_base64url(&mac))
}

/// Verify a signed cookie value and recover the token
///
/// Expiry is not checked here; see [`validate_token_pair`].
pub fn open_cookie(
    cookie: &str,
    secret: &[u8; 32],
    ttl_ms: i64,
) -> Result<CsrfToken, CsrfRejection> {
    if cookie.len() > MAX_COOKIE_LEN {
        return Err(CsrfRejection::MalformedCookie);
    }

    let (payload, mac_b64) = cookie
        .rsplit_once('.')
        .ok_or(CsrfRejection::MalformedCookie)?;
    let (value, issued_at) = payload
        .split_once('.')
        .ok_or(CsrfRejection::MalformedCookie)?;
    if value.is_empty() {
        return Err(CsrfRejection::MalformedCookie);
    }
    let issued_at_ms: i64 = issued_at
        .parse()
        .map_err(|_| CsrfRejection::MalformedCookie)?;
    let mac = from_base64url(mac_b64).map_err(|_| CsrfRejection::MalformedCookie)?;

    if !verify_hmac_sha256(secret, payload.as_bytes(), &mac) {
        return Err(CsrfRejection::BadSignature);
    }

    Ok(CsrfToken {
        value: value.to_string(),
        issued_at_ms,
        expires_at_ms: issued_at_ms.saturating_add(ttl_ms),
    })
}

/// Check the header token against the cookie-bound token
///
/// Oversized header values are rejected before any comparison.
pub fn validate_token_pair(
    header_token: Option<&str>,
    cookie: Option<&str>,
    secret: &[u8; 32],
    ttl_ms: i64,
    now_ms: i64,
) -> Result<(), CsrfRejection> {
    let header_token = header_token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(CsrfRejection::MissingToken)?;
    if header_token.len() > MAX_HEADER_TOKEN_LEN {
        return Err(CsrfRejection::TokenTooLong);
    }

    let cookie = cookie
        .filter(|c| !c.is_empty())
        .ok_or(CsrfRejection::MissingCookie)?;
    let token = open_cookie(cookie, secret, ttl_ms)?;

    if token.is_expired_at(now_ms) {
        return Err(CsrfRejection::Expired);
    }

    if !constant_time_eq(header_token.as_bytes(), token.value.as_bytes()) {
        return Err(CsrfRejection::TokenMismatch);
    }

    Ok(())
}
