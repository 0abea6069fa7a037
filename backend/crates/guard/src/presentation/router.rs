//! Guard Router

use crate::domain::repository::CounterStore;
use crate::presentation::handlers::{self, GuardState};
use crate::presentation::middleware::{csrf_protect, rate_limit};
use crate::presentation::security_headers::with_security_headers;
use axum::{Router, middleware, routing::get};

/// Router serving `GET /csrf-token`
pub fn csrf_token_router<S>(state: GuardState<S>) -> Router
where
    S: CounterStore + Send + Sync + 'static,
{
    Router::new()
        .route("/csrf-token", get(handlers::issue_csrf_token::<S>))
        .with_state(state)
}

/// Put a router behind the guard
///
/// Order per request: security headers (outermost), rate limit, CSRF, routes.
pub fn protect<S>(router: Router, state: GuardState<S>) -> Router
where
    S: CounterStore + Send + Sync + 'static,
{
    let router = router
        .layer(middleware::from_fn_with_state(
            state.clone(),
            csrf_protect::<S>,
        ))
        .layer(middleware::from_fn_with_state(state, rate_limit::<S>));

    with_security_headers(router)
}
