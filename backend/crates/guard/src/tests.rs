//! Router-level tests for the guard crate

#[cfg(test)]
mod router_tests {
    use crate::application::config::GuardConfig;
    use crate::domain::entities::RateLimitCounter;
    use crate::domain::repository::CounterStore;
    use crate::error::{GuardError, GuardResult};
    use crate::infra::memory::MemoryCounterStore;
    use crate::presentation::handlers::GuardState;
    use crate::presentation::router::{csrf_token_router, protect};
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use axum::routing::{get, post};
    use platform::rate_limit::RateLimitConfig;
    use serde_json::Value;
    use std::time::Duration;
    use tower::ServiceExt;

    const ORIGIN: &str = "http://localhost:3000";

    fn config(max_requests: u32) -> GuardConfig {
        let mut config = GuardConfig::development();
        config.rate_limit = RateLimitConfig::new(max_requests, Duration::from_secs(10)).unwrap();
        config
    }

    fn app_with<S>(state: GuardState<S>) -> Router
    where
        S: CounterStore + Send + Sync + 'static,
    {
        let business = Router::new()
            .route("/submit", post(|| async { "accepted" }))
            .route("/ping", get(|| async { "pong" }));

        protect(csrf_token_router(state.clone()).merge(business), state)
    }

    fn app(max_requests: u32) -> Router {
        app_with(GuardState::new(MemoryCounterStore::new(), config(max_requests)))
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Fetch a token; returns (header token, `name=value` cookie pair)
    async fn fetch_token(app: &Router, client_ip: &str) -> (String, String) {
        let response = app
            .clone()
            .oneshot(
                Request::get("/csrf-token")
                    .header("x-forwarded-for", client_ip)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let cookie = set_cookie.split(';').next().unwrap().to_string();
        let body = json_body(response).await;
        (body["csrfToken"].as_str().unwrap().to_string(), cookie)
    }

    fn submit(origin: Option<&str>, token: Option<&str>, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::post("/submit").header("x-forwarded-for", "203.0.113.7");
        if let Some(origin) = origin {
            builder = builder.header(header::ORIGIN, origin);
        }
        if let Some(token) = token {
            builder = builder.header("x-csrf-token", token);
        }
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn assert_security_headers(response: &Response) {
        let headers = response.headers();
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["x-xss-protection"], "1; mode=block");
    }

    #[tokio::test]
    async fn test_token_endpoint_sets_cookie() {
        let app = app(20);
        let response = app
            .oneshot(Request::get("/csrf-token").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with("__csrf_token="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Strict"));
        assert!(set_cookie.contains("Max-Age=3600"));
        assert_security_headers(&response);

        let body = json_body(response).await;
        // 32 bytes base64url without padding
        assert_eq!(body["csrfToken"].as_str().unwrap().len(), 43);
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let app = app(20);
        let (first, _) = fetch_token(&app, "198.51.100.1").await;
        let (second, _) = fetch_token(&app, "198.51.100.1").await;
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_valid_token_passes() {
        let app = app(20);
        let (token, cookie) = fetch_token(&app, "198.51.100.2").await;

        let response = app
            .oneshot(submit(Some(ORIGIN), Some(&token), Some(&cookie)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_security_headers(&response);
    }

    #[tokio::test]
    async fn test_null_origin_rejected_with_valid_token() {
        let app = app(20);
        let (token, cookie) = fetch_token(&app, "198.51.100.3").await;

        let response = app
            .oneshot(submit(Some("null"), Some(&token), Some(&cookie)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "CSRF_VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn test_origin_trailing_slash_accepted() {
        let app = app(20);
        let (token, cookie) = fetch_token(&app, "198.51.100.4").await;

        let response = app
            .oneshot(submit(Some("http://localhost:3000/"), Some(&token), Some(&cookie)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_safe_method_bypasses_csrf() {
        let response = app(20)
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_token_rejected() {
        let app = app(20);
        let (_, cookie) = fetch_token(&app, "198.51.100.3").await;

        let response = app
            .oneshot(submit(Some(ORIGIN), None, Some(&cookie)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_security_headers(&response);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "CSRF_VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn test_mismatched_token_rejected() {
        let app = app(20);
        let (token, _) = fetch_token(&app, "198.51.100.4").await;
        let (_, other_cookie) = fetch_token(&app, "198.51.100.4").await;

        let response = app
            .oneshot(submit(Some(ORIGIN), Some(&token), Some(&other_cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_tampered_cookie_rejected() {
        let app = app(20);
        let (token, cookie) = fetch_token(&app, "198.51.100.5").await;
        let tampered = cookie.replacen('.', ".1", 1);

        let response = app
            .oneshot(submit(Some(ORIGIN), Some(&token), Some(&tampered)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_rejections_are_indistinguishable() {
        let app = app(20);
        let (token, cookie) = fetch_token(&app, "198.51.100.6").await;

        let foreign_origin = app
            .clone()
            .oneshot(submit(
                Some("https://evil.example"),
                Some(&token),
                Some(&cookie),
            ))
            .await
            .unwrap();
        let missing_origin = app
            .clone()
            .oneshot(submit(None, Some(&token), Some(&cookie)))
            .await
            .unwrap();
        let missing_cookie = app
            .oneshot(submit(Some(ORIGIN), Some(&token), None))
            .await
            .unwrap();

        assert_eq!(foreign_origin.status(), StatusCode::FORBIDDEN);
        assert_eq!(missing_origin.status(), StatusCode::FORBIDDEN);
        assert_eq!(missing_cookie.status(), StatusCode::FORBIDDEN);

        let a = json_body(foreign_origin).await;
        let b = json_body(missing_origin).await;
        let c = json_body(missing_cookie).await;
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[tokio::test]
    async fn test_rate_limit_returns_429() {
        let app = app(3);

        for _ in 0..3 {
            let response = app
                .clone()
                .oneshot(
                    Request::get("/ping")
                        .header("x-forwarded-for", "192.0.2.10")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .clone()
            .oneshot(
                Request::get("/ping")
                    .header("x-forwarded-for", "192.0.2.10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_security_headers(&response);
        let retry_after: u64 = response.headers()[header::RETRY_AFTER]
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!((1..=10).contains(&retry_after));

        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "RATE_LIMITED");
        assert_eq!(body["error"]["details"]["retryAfter"], retry_after);

        // Another client is unaffected
        let response = app
            .oneshot(
                Request::get("/ping")
                    .header("x-forwarded-for", "192.0.2.11")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rotating_forwarded_for_ignored_when_untrusted() {
        let mut config = config(2);
        config.trust_forwarded_for = false;
        let app = app_with(GuardState::new(MemoryCounterStore::new(), config));

        let mut statuses = Vec::new();
        for forwarded in ["192.0.2.1", "192.0.2.2", "192.0.2.3"] {
            let response = app
                .clone()
                .oneshot(
                    Request::get("/ping")
                        .header("x-forwarded-for", forwarded)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            statuses.push(response.status());
        }

        assert_eq!(
            statuses,
            [StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]
        );
    }

    #[tokio::test]
    async fn test_rate_limit_runs_before_csrf() {
        let app = app(1);
        let first = app.clone().oneshot(submit(None, None, None)).await.unwrap();
        assert_eq!(first.status(), StatusCode::FORBIDDEN);

        let second = app.oneshot(submit(None, None, None)).await.unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    struct FailingStore;

    impl CounterStore for FailingStore {
        async fn get(&self, _key: &str) -> GuardResult<Option<RateLimitCounter>> {
            Err(GuardError::Internal("store down".into()))
        }

        async fn increment(
            &self,
            _key: &str,
            _now_ms: i64,
            _window_ms: i64,
        ) -> GuardResult<RateLimitCounter> {
            Err(GuardError::Internal("store down".into()))
        }

        async fn expire(&self, _key: &str) -> GuardResult<()> {
            Err(GuardError::Internal("store down".into()))
        }

        async fn purge_expired(&self, _now_ms: i64, _window_ms: i64) -> GuardResult<u64> {
            Err(GuardError::Internal("store down".into()))
        }
    }

    #[tokio::test]
    async fn test_store_failure_allows_request() {
        let app = app_with(GuardState::new(FailingStore, config(1)));

        for _ in 0..3 {
            let response = app
                .clone()
                .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }
}

#[cfg(test)]
mod use_case_tests {
    use crate::application::check_rate_limit::CheckRateLimitUseCase;
    use crate::application::config::GuardConfig;
    use crate::application::issue_token::IssueCsrfTokenUseCase;
    use crate::application::validate_request::ValidateCsrfUseCase;
    use crate::error::GuardError;
    use crate::infra::memory::MemoryCounterStore;
    use axum::http::{HeaderMap, HeaderValue, Method, header};
    use platform::client::ClientIdentity;
    use platform::rate_limit::RateLimitConfig;
    use std::sync::Arc;
    use std::time::Duration;

    fn guard_config() -> Arc<GuardConfig> {
        let mut config = GuardConfig::development();
        config.rate_limit = RateLimitConfig::new(2, Duration::from_secs(10)).unwrap();
        config.csrf.exempt_paths = vec!["/api/webhooks".to_string()];
        Arc::new(config)
    }

    fn signed_headers(config: &Arc<GuardConfig>, now_ms: i64) -> HeaderMap {
        let output = IssueCsrfTokenUseCase::new(config.clone()).execute(now_ms);
        let cookie = output.set_cookie.split(';').next().unwrap().to_string();

        let mut headers = HeaderMap::new();
        headers.insert(header::ORIGIN, HeaderValue::from_static("http://localhost:3000"));
        headers.insert("x-csrf-token", HeaderValue::from_str(&output.token).unwrap());
        headers.insert(header::COOKIE, HeaderValue::from_str(&cookie).unwrap());
        headers
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = guard_config();
        let headers = signed_headers(&config, 1_000);
        let use_case = ValidateCsrfUseCase::new(config.clone());

        assert!(
            use_case
                .validate(&Method::POST, "/api/contact", &headers, 2_000)
                .is_ok()
        );

        let later = 1_000 + config.csrf.token_ttl_ms();
        assert!(matches!(
            use_case.validate(&Method::POST, "/api/contact", &headers, later),
            Err(GuardError::CsrfValidationFailed)
        ));
    }

    #[test]
    fn test_exempt_path_and_safe_methods() {
        let use_case = ValidateCsrfUseCase::new(guard_config());
        let empty = HeaderMap::new();

        assert!(use_case.validate(&Method::GET, "/api/contact", &empty, 0).is_ok());
        assert!(use_case.validate(&Method::HEAD, "/api/contact", &empty, 0).is_ok());
        assert!(use_case.validate(&Method::OPTIONS, "/api/contact", &empty, 0).is_ok());
        assert!(
            use_case
                .validate(&Method::POST, "/api/webhooks/stripe", &empty, 0)
                .is_ok()
        );
        for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
            assert!(use_case.validate(&method, "/api/contact", &empty, 0).is_err());
        }
    }

    #[test]
    fn test_other_secret_rejects_cookie() {
        let config = guard_config();
        let headers = signed_headers(&config, 1_000);

        let other = Arc::new(GuardConfig::development());
        let use_case = ValidateCsrfUseCase::new(other);
        assert!(
            use_case
                .validate(&Method::POST, "/api/contact", &headers, 2_000)
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_rate_limit_window_resets() {
        let store = Arc::new(MemoryCounterStore::new());
        let use_case = CheckRateLimitUseCase::new(store, guard_config());
        let client = ClientIdentity::Ip("192.0.2.1".parse().unwrap());

        assert_eq!(use_case.check_at(&client, 0).await.unwrap().remaining, 1);
        assert_eq!(use_case.check_at(&client, 1_000).await.unwrap().remaining, 0);

        match use_case.check_at(&client, 2_500).await {
            Err(GuardError::RateLimited { retry_after_secs }) => assert_eq!(retry_after_secs, 8),
            other => panic!("expected RateLimited, got {other:?}"),
        }

        // Window elapsed: counting starts over
        let result = use_case.check_at(&client, 10_000).await.unwrap();
        assert!(result.allowed);
        assert_eq!(result.remaining, 1);
    }
}
