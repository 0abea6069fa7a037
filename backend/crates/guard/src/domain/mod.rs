//! Domain Layer - Guard logic and entities
//!
//! This layer contains:
//! - Domain entities (CsrfToken, RateLimitCounter)
//! - Domain value objects (AllowedOrigins, CsrfRejection)
//! - Domain services (token signing and comparison)
//! - Repository traits (counter store interface)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
