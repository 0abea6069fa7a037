//! Application Layer - Use Cases
//!
//! Orchestrates guard domain logic and the counter store.

pub mod check_rate_limit;
pub mod config;
pub mod issue_token;
pub mod validate_request;
