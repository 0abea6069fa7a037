//! Client identification utilities
//!
//! Common functions for identifying clients via HTTP headers. The identity
//! is the key the rate limiter counts requests under.

use axum::http::HeaderMap;
use std::fmt;
use std::net::IpAddr;

use crate::crypto::{sha256, to_base64url};

/// Who a request is attributed to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClientIdentity {
    /// Resolved client IP address
    Ip(IpAddr),
    /// Hash of a session-bound cookie value (no IP available)
    Session(String),
    /// Neither IP nor session known; all such requests share one bucket
    Anonymous,
}

impl ClientIdentity {
    /// Resolve identity from IP first, then a session cookie value
    pub fn resolve(ip: Option<IpAddr>, session_cookie: Option<&str>) -> Self {
        if let Some(ip) = ip {
            return ClientIdentity::Ip(ip);
        }
        match session_cookie.filter(|v| !v.is_empty()) {
            Some(value) => ClientIdentity::Session(to_base64url(&sha256(value.as_bytes())[..16])),
            None => ClientIdentity::Anonymous,
        }
    }

    /// Storage key for counters
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientIdentity::Ip(ip) => write!(f, "ip:{ip}"),
            ClientIdentity::Session(hash) => write!(f, "session:{hash}"),
            ClientIdentity::Anonymous => f.write_str("anonymous"),
        }
    }
}

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to direct connection IP.
///
/// The header is client-controlled unless a proxy in front overwrites it.
/// Callers that are reachable directly should pass only the socket address.
///
/// ## Arguments
/// * `headers` - HTTP request headers
/// * `direct_ip` - Direct connection IP address
///
/// ## Returns
/// The client IP address, or None if not determinable
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}
