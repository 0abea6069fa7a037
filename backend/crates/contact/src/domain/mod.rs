//! Domain Layer
//!
//! Contact form schema and inquiry records.

pub mod entities;
pub mod repository;
pub mod schema;
