//! Guard Middleware
//!
//! `rate_limit` runs first, then `csrf_protect`, then the business handler.

use crate::application::check_rate_limit::CheckRateLimitUseCase;
use crate::application::validate_request::ValidateCsrfUseCase;
use crate::domain::repository::CounterStore;
use crate::error::GuardError;
use crate::presentation::handlers::GuardState;
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use platform::client::{ClientIdentity, extract_client_ip};
use platform::cookie::extract_cookie;
use std::net::SocketAddr;

/// Resolve the rate limit identity of a request
///
/// `X-Forwarded-For` is only consulted when `trust_forwarded_for` is set.
pub fn request_identity(
    req: &Request,
    cookie_name: &str,
    trust_forwarded_for: bool,
) -> ClientIdentity {
    let headers = req.headers();

    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());

    let client_ip = if trust_forwarded_for {
        extract_client_ip(headers, direct_ip)
    } else {
        direct_ip
    };
    let session = extract_cookie(headers, cookie_name);

    ClientIdentity::resolve(client_ip, session.as_deref())
}

/// Middleware that throttles requests per client identity
///
/// A failing counter store lets the request through.
pub async fn rate_limit<S>(State(state): State<GuardState<S>>, req: Request, next: Next) -> Response
where
    S: CounterStore + Send + Sync + 'static,
{
    let identity = request_identity(
        &req,
        &state.config.csrf.cookie_name,
        state.config.trust_forwarded_for,
    );

    let use_case = CheckRateLimitUseCase::new(state.store.clone(), state.config.clone());

    match use_case.check(&identity).await {
        Ok(_) => next.run(req).await,
        Err(err @ GuardError::RateLimited { .. }) => err.into_response(),
        Err(err) => {
            tracing::error!(
                error = %err,
                identity = %identity,
                "Rate limit store failure, allowing request"
            );
            next.run(req).await
        }
    }
}

/// Middleware that rejects mutating requests failing CSRF validation
pub async fn csrf_protect<S>(
    State(state): State<GuardState<S>>,
    req: Request,
    next: Next,
) -> Response
where
    S: CounterStore + Send + Sync + 'static,
{
    let use_case = ValidateCsrfUseCase::new(state.config.clone());

    if let Err(err) = use_case.validate(
        req.method(),
        req.uri().path(),
        req.headers(),
        Utc::now().timestamp_millis(),
    ) {
        return err.into_response();
    }

    next.run(req).await
}
