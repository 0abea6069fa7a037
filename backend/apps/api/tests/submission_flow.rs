//! End-to-end: the form client against a running API server

use api::build_app;
use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use contact::{ContactForm, ContactState, MemoryInquiryRepository};
use forms::options::UNEXPECTED_ERROR_MESSAGE;
use forms::{ApiClient, FieldErrorStore, FormSubmission, SubmissionOptions};
use guard::{GuardConfig, GuardState, MemoryCounterStore};
use kernel::error::code::ErrorCode;
use kernel::response::{ApiResponse, ErrorBody};
use platform::rate_limit::RateLimitConfig;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::TcpListener;

const SITE_ORIGIN: &str = "http://localhost:3000";

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    format!("http://{addr}")
}

async fn spawn_api(max_requests: u32) -> String {
    let mut config = GuardConfig::development();
    config.rate_limit = RateLimitConfig::new(max_requests, Duration::from_secs(10)).unwrap();

    let app = build_app(
        GuardState::new(MemoryCounterStore::new(), config),
        ContactState::new(MemoryInquiryRepository::new()),
        &[SITE_ORIGIN.to_string()],
    );
    serve(app).await
}

fn contact_form() -> ContactForm {
    ContactForm {
        name: "山田太郎".to_string(),
        email: "taro@example.com".to_string(),
        company: None,
        phone: Some("090-1234-5678".to_string()),
        message: "導入について相談させてください。".to_string(),
    }
}

fn contact_submission(
    client: ApiClient,
    form: Arc<FieldErrorStore>,
) -> FormSubmission<ContactForm, Value, impl forms::Submitter<ContactForm, Value>> {
    FormSubmission::new(
        move |input: ContactForm| {
            let client = client.clone();
            async move {
                let result = client.post_json::<_, Value>("/api/contact", &input).await?;
                anyhow::Ok(result)
            }
        },
        form,
    )
    .with_options(SubmissionOptions::silent())
}

#[tokio::test]
async fn test_contact_form_round_trip() {
    let base = spawn_api(20).await;
    let client = ApiClient::new(&base, SITE_ORIGIN).unwrap();
    let form = Arc::new(FieldErrorStore::new());
    let submission = contact_submission(client.clone(), form.clone());

    let result = submission
        .submit_form(contact_form())
        .await
        .unwrap()
        .unwrap();

    assert!(result.is_success());
    let state = submission.state();
    assert_eq!(state.submit_status.message, "お問い合わせを受け付けました");
    assert_eq!(state.submit_error, None);
    assert!(form.errors().is_empty());

    submission.wait_idle().await;
    assert!(!submission.is_submitting());
}

#[tokio::test]
async fn test_server_field_errors_reach_form() {
    let base = spawn_api(20).await;
    let client = ApiClient::new(&base, SITE_ORIGIN).unwrap();
    let form = Arc::new(FieldErrorStore::new());
    let submission = contact_submission(client.clone(), form.clone());

    // Skip client-side validation so the server rejects it
    let invalid = ContactForm {
        message: "短い".to_string(),
        ..contact_form()
    };
    let result = submission.handle_submit(invalid).await.unwrap();

    let error = result.error().unwrap();
    assert!(error.has_code(ErrorCode::ValidationError));
    assert_eq!(
        form.error("message").as_deref(),
        Some("お問い合わせ内容は10〜2000文字で入力してください")
    );
    assert_eq!(
        submission.state().submit_error.as_deref(),
        Some("入力内容に誤りがあります")
    );
}

#[tokio::test]
async fn test_foreign_origin_is_rejected() {
    let base = spawn_api(20).await;
    let client = ApiClient::new(&base, "https://evil.example").unwrap();

    let result = client
        .post_json::<_, Value>("/api/contact", &contact_form())
        .await
        .unwrap();

    let error = result.error().unwrap();
    assert!(error.has_code(ErrorCode::CsrfValidationFailed));
}

#[tokio::test]
async fn test_rate_limited_submission() {
    // Token fetch + two posts fit; the third post is over the limit
    let base = spawn_api(3).await;
    let client = ApiClient::new(&base, SITE_ORIGIN).unwrap();

    for _ in 0..2 {
        let result = client
            .post_json::<_, Value>("/api/contact", &contact_form())
            .await
            .unwrap();
        assert!(result.is_success());
    }

    let result = client
        .post_json::<_, Value>("/api/contact", &contact_form())
        .await
        .unwrap();
    let error = result.error().unwrap();
    assert!(error.has_code(ErrorCode::RateLimited));
    let retry_after = error.retry_after().unwrap();
    assert!((1..=10).contains(&retry_after));
}

#[tokio::test]
async fn test_unreachable_server_is_unexpected_error() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = ApiClient::new(&base, SITE_ORIGIN).unwrap();
    let submission = contact_submission(client.clone(), Arc::new(FieldErrorStore::new()));

    let result = submission.handle_submit(contact_form()).await.unwrap();

    assert!(
        result
            .error()
            .unwrap()
            .has_code(ErrorCode::UnexpectedError)
    );
    assert_eq!(
        submission.state().submit_error.as_deref(),
        Some(UNEXPECTED_ERROR_MESSAGE)
    );
}

/// Stub server that rejects the first post with a CSRF failure
async fn spawn_flaky_csrf_server() -> (String, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let issued = Arc::new(AtomicUsize::new(0));
    let posts = Arc::new(AtomicUsize::new(0));

    let issued_counter = issued.clone();
    let posts_counter = posts.clone();
    let app = Router::new()
        .route(
            "/api/csrf-token",
            get(move || {
                let n = issued_counter.fetch_add(1, Ordering::SeqCst);
                async move { Json(json!({"csrfToken": format!("token-{n}")})) }
            }),
        )
        .route(
            "/api/contact",
            post(move |headers: HeaderMap| {
                posts_counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    let token = headers
                        .get("x-csrf-token")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    if token == "token-0" {
                        let body: ApiResponse<Value> = ApiResponse::failure(
                            ErrorBody::new("CSRF token validation failed")
                                .with_code(ErrorCode::CsrfValidationFailed),
                        );
                        (StatusCode::FORBIDDEN, Json(body))
                    } else {
                        (
                            StatusCode::OK,
                            Json(ApiResponse::success(json!({"message": token}))),
                        )
                    }
                }
            }),
        );

    (serve(app).await, issued, posts)
}

#[tokio::test]
async fn test_csrf_failure_retried_with_fresh_token() {
    let (base, issued, posts) = spawn_flaky_csrf_server().await;
    let client = ApiClient::new(&base, SITE_ORIGIN).unwrap();

    let result = client
        .post_json::<_, Value>("/api/contact", &contact_form())
        .await
        .unwrap();

    assert_eq!(result, ApiResponse::success(json!({"message": "token-1"})));
    assert_eq!(issued.load(Ordering::SeqCst), 2);
    assert_eq!(posts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_non_envelope_response_is_client_error() {
    let app = Router::new()
        .route(
            "/api/csrf-token",
            get(|| async { Json(json!({"csrfToken": "t"})) }),
        )
        .route(
            "/api/contact",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
    let base = serve(app).await;
    let client = ApiClient::new(&base, SITE_ORIGIN).unwrap();

    let err = client
        .post_json::<_, Value>("/api/contact", &contact_form())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        forms::ClientError::UnexpectedResponse { status: 502 }
    ));
}
