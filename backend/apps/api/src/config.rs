//! Server Configuration
//!
//! Read from environment variables (a `.env` file is loaded first by `main`).

use anyhow::{Context, bail};
use guard::application::config::RateLimitConfig;
use guard::domain::value_objects::AllowedOrigins;
use guard::{CsrfConfig, GuardConfig};
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
pub const DEFAULT_SITE_ORIGIN: &str = "http://localhost:3000";

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Origin of the site serving the forms
    pub site_origin: String,
    /// Additional origins allowed to post
    pub extra_origins: Vec<String>,
    pub csrf_secret: [u8; 32],
    pub token_ttl: Duration,
    pub cookie_secure: bool,
    /// Key rate limits on `X-Forwarded-For` (set false without a proxy)
    pub trust_forwarded_for: bool,
    pub rate_limit: RateLimitConfig,
    /// Shared counter store; in-memory counters when unset
    pub database_url: Option<String>,
}

impl ApiConfig {
    /// Load from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key/value source
    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address")?;

        let site_origin = var("SITE_ORIGIN").unwrap_or_else(|| DEFAULT_SITE_ORIGIN.to_string());
        let extra_origins = var("ALLOWED_ORIGINS")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let csrf_secret = match var("CSRF_SECRET") {
            Some(encoded) => decode_secret(&encoded)?,
            None if cfg!(debug_assertions) => {
                tracing::warn!("CSRF_SECRET not set, using a random secret for this process");
                platform::crypto::random_key()
            }
            None => bail!("CSRF_SECRET must be set in production"),
        };

        let token_ttl = Duration::from_secs(parse_or(&var, "CSRF_TOKEN_TTL_SECS", 3600)?);
        if token_ttl.is_zero() {
            bail!("CSRF_TOKEN_TTL_SECS must be greater than 0");
        }

        let cookie_secure = match var("COOKIE_SECURE") {
            Some(value) => parse_bool(&value).context("COOKIE_SECURE must be true or false")?,
            None => !cfg!(debug_assertions),
        };

        let trust_forwarded_for = match var("TRUST_FORWARDED_FOR") {
            Some(value) => {
                parse_bool(&value).context("TRUST_FORWARDED_FOR must be true or false")?
            }
            None => true,
        };

        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig::new(
            parse_or(&var, "RATE_LIMIT_MAX_REQUESTS", defaults.max_requests)?,
            Duration::from_secs(parse_or(
                &var,
                "RATE_LIMIT_WINDOW_SECS",
                defaults.window.as_secs(),
            )?),
        )
        .context("invalid rate limit settings")?;

        Ok(Self {
            bind_addr,
            site_origin,
            extra_origins,
            csrf_secret,
            token_ttl,
            cookie_secure,
            trust_forwarded_for,
            rate_limit,
            database_url: var("DATABASE_URL"),
        })
    }

    /// Site origin followed by the extra origins
    pub fn allowed_origins(&self) -> Vec<String> {
        std::iter::once(self.site_origin.clone())
            .chain(self.extra_origins.iter().cloned())
            .collect()
    }

    pub fn guard_config(&self) -> GuardConfig {
        GuardConfig {
            csrf: CsrfConfig {
                token_ttl: self.token_ttl,
                secret: self.csrf_secret,
                allowed_origins: AllowedOrigins::new(self.allowed_origins()),
                cookie_secure: self.cookie_secure,
                ..CsrfConfig::default()
            },
            rate_limit: self.rate_limit.clone(),
            trust_forwarded_for: self.trust_forwarded_for,
        }
    }
}

fn decode_secret(encoded: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = platform::crypto::from_base64(encoded).context("CSRF_SECRET must be base64")?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| anyhow::anyhow!("CSRF_SECRET must decode to 32 bytes, got {}", bytes.len()))
}

fn parse_or<T, V>(var: &V, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    V: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(value) => value
            .parse()
            .with_context(|| format!("{key} has an invalid value: {value}")),
        None => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
