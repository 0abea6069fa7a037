//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC, Base64/Base64url, random keys)
//! - Cookie management
//! - Client identification (IP / session) for rate limiting
//! - Fixed-window rate limit arithmetic

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod rate_limit;
