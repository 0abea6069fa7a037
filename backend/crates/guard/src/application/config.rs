//! Application Configuration
//!
//! Configuration for the CSRF guard and the rate limiter.

use std::time::Duration;

pub use platform::cookie::SameSite;
pub use platform::rate_limit::RateLimitConfig;

use platform::cookie::CookieConfig;

use crate::domain::value_objects::AllowedOrigins;

/// CSRF guard configuration
#[derive(Debug, Clone)]
pub struct CsrfConfig {
    /// Cookie holding the signed token
    pub cookie_name: String,
    /// Request header carrying the raw token
    pub header_name: String,
    /// Token lifetime (also the cookie Max-Age)
    pub token_ttl: Duration,
    /// HMAC key for cookie signing (32 bytes); random per process unless set
    pub secret: [u8; 32],
    /// Origins allowed to send mutating requests
    pub allowed_origins: AllowedOrigins,
    /// Path prefixes skipped by the guard
    pub exempt_paths: Vec<String>,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            cookie_name: "__csrf_token".to_string(),
            header_name: "x-csrf-token".to_string(),
            token_ttl: Duration::from_secs(3600),
            secret: platform::crypto::random_key(),
            allowed_origins: AllowedOrigins::new(["http://localhost:3000"]),
            exempt_paths: Vec::new(),
            cookie_secure: true,
            cookie_same_site: SameSite::Strict,
        }
    }
}

impl CsrfConfig {
    pub fn token_ttl_ms(&self) -> i64 {
        self.token_ttl.as_millis() as i64
    }

    /// Cookie attributes for the token cookie
    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig {
            name: self.cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.token_ttl.as_secs()),
        }
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt_paths
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

/// Guard configuration
#[derive(Debug, Clone)]
pub struct GuardConfig {
    pub csrf: CsrfConfig,
    pub rate_limit: RateLimitConfig,
    /// Key rate limits on the first `X-Forwarded-For` address
    ///
    /// Only sound behind a proxy that overwrites the header. Otherwise a
    /// client picks a fresh bucket per request; turn this off so the socket
    /// address is used instead.
    pub trust_forwarded_for: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            csrf: CsrfConfig::default(),
            rate_limit: RateLimitConfig::default(),
            trust_forwarded_for: true,
        }
    }
}

impl GuardConfig {
    /// Create config with a fresh random signing secret
    pub fn with_random_secret() -> Self {
        let mut config = Self::default();
        config.csrf.secret = platform::crypto::random_key();
        config
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        let mut config = Self::with_random_secret();
        config.csrf.cookie_secure = false;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_secret_is_random() {
        let a = CsrfConfig::default();
        let b = CsrfConfig::default();
        assert_ne!(a.secret, [0u8; 32]);
        assert_ne!(a.secret, b.secret);
        assert_ne!(GuardConfig::default().csrf.secret, GuardConfig::default().csrf.secret);
    }

    #[test]
    fn test_development_cookie_not_secure() {
        let config = GuardConfig::development();
        assert!(!config.csrf.cookie_secure);
        assert!(config.trust_forwarded_for);
        assert!(CsrfConfig::default().cookie_secure);
    }
}
