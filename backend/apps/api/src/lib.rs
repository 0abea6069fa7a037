//! API Server Library
//!
//! Router assembly and configuration, shared by the binary and the
//! end-to-end tests.

pub mod config;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use contact::{ContactState, InquiryRepository, contact_router};
use guard::{CounterStore, GuardState, csrf_token_router, protect, with_security_headers};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// CORS for the site origins; credentials allowed for the token cookie
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.trim().trim_end_matches('/').parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-csrf-token"),
        ]))
        .allow_credentials(true)
}

/// Build the application router
///
/// Every route under `/api` sits behind the guard (rate limit, then CSRF for
/// mutating methods). Security headers wrap CORS too, so preflight answers
/// carry them.
pub fn build_app<S, R>(
    guard_state: GuardState<S>,
    contact_state: ContactState<R>,
    allowed_origins: &[String],
) -> Router
where
    S: CounterStore + Send + Sync + 'static,
    R: InquiryRepository + Send + Sync + 'static,
{
    let api = csrf_token_router(guard_state.clone()).merge(contact_router(contact_state));

    let app = protect(Router::new().nest("/api", api), guard_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins));

    with_security_headers(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use contact::MemoryInquiryRepository;
    use guard::{GuardConfig, MemoryCounterStore};
    use tower::ServiceExt;

    const SITE: &str = "http://localhost:3000";

    fn app() -> Router {
        build_app(
            GuardState::new(MemoryCounterStore::new(), GuardConfig::development()),
            ContactState::new(MemoryInquiryRepository::new()),
            &[SITE.to_string()],
        )
    }

    #[tokio::test]
    async fn test_preflight_carries_security_headers() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/contact")
                    .header(header::ORIGIN, SITE)
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type,x-csrf-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], SITE);
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
        assert_eq!(headers[header::X_XSS_PROTECTION], "1; mode=block");
    }

    #[tokio::test]
    async fn test_unknown_route_carries_security_headers() {
        let response = app()
            .oneshot(Request::get("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
    }
}
