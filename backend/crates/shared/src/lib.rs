//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of vocabulary shared by the
//! server crates and the form client:
//! - Common error types, error codes and result aliases
//! - The JSON response envelope (`{success, data | error}`)
//! - Schema validation helpers (field error flattening)
//! - Typed ID wrappers
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning on both sides of the wire.

pub mod error {
    pub mod app_error;
    pub mod code;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod response;
pub mod validation;
