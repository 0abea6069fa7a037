//! Contact Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Contact form schema, inquiry entity, repository trait
//! - `application/` - Submit inquiry use case
//! - `infra/` - Repository implementations
//! - `presentation/` - HTTP handler and router
//!
//! The router is meant to be mounted behind the request guard; this crate
//! does no CSRF or rate limit checks of its own.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use domain::repository::InquiryRepository;
pub use domain::schema::ContactForm;
pub use error::{ContactError, ContactResult};
pub use infra::memory::MemoryInquiryRepository;
pub use presentation::handlers::ContactState;
pub use presentation::router::contact_router;
