//! Request Guard Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Token entities, validation rules, counter store trait
//! - `application/` - Use cases and configuration
//! - `infra/` - Counter store implementations (memory, PostgreSQL)
//! - `presentation/` - Token endpoint, middleware, router
//!
//! ## Security Model
//! - Mutating requests need a matching header token and signed cookie
//! - The cookie is HMAC-signed and carries its issue time; no server-side token state
//! - Origin must be in the allow list before the token is even looked at
//! - Every CSRF failure produces the same 403 body
//! - Fixed-window rate limiting per client identity runs before CSRF checks

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{CsrfConfig, GuardConfig};
pub use domain::repository::CounterStore;
pub use error::{GuardError, GuardResult};
pub use infra::memory::MemoryCounterStore;
pub use infra::postgres::PgCounterStore;
pub use presentation::handlers::GuardState;
pub use presentation::router::{csrf_token_router, protect};
pub use presentation::security_headers::with_security_headers;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
