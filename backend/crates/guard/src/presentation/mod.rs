//! Presentation Layer
//!
//! HTTP handlers, middleware, security headers and router.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod security_headers;
