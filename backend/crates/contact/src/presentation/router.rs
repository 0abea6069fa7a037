//! Contact Router

use crate::domain::repository::InquiryRepository;
use crate::presentation::handlers::{self, ContactState};
use axum::{Router, routing::post};

/// Router serving `POST /contact`
pub fn contact_router<R>(state: ContactState<R>) -> Router
where
    R: InquiryRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/contact", post(handlers::submit_contact::<R>))
        .with_state(state)
}
