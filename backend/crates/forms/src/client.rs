//! Form API Client
//!
//! Fetches a CSRF token, keeps the token cookie in its cookie jar and posts
//! JSON with the `x-csrf-token` and `Origin` headers the guard expects.

use kernel::error::code::ErrorCode;
use kernel::response::ApiResponse;
use reqwest::header::ORIGIN;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::SubmissionResult;
use crate::error::{ClientError, ClientResult};

pub const CSRF_TOKEN_PATH: &str = "/api/csrf-token";
pub const CSRF_HEADER: &str = "x-csrf-token";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsrfTokenBody {
    csrf_token: String,
}

/// HTTP client for form endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    origin: String,
    token: Arc<Mutex<Option<String>>>,
}

impl ApiClient {
    /// `base_url` is the API server; `origin` is sent as the `Origin` header
    pub fn new(base_url: impl Into<String>, origin: impl Into<String>) -> ClientResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!("base URL must be http(s): {base_url}")));
        }

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            origin: origin.into(),
            token: Arc::new(Mutex::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET the token endpoint and cache the token; the cookie lands in the jar
    pub async fn fetch_csrf_token(&self) -> ClientResult<String> {
        let response = self.http.get(self.url(CSRF_TOKEN_PATH)).send().await?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(ClientError::TokenUnavailable { status });
        }

        let body: CsrfTokenBody = response
            .json()
            .await
            .map_err(|_| ClientError::TokenUnavailable { status })?;

        *self.token.lock().await = Some(body.csrf_token.clone());
        tracing::debug!("Fetched CSRF token");

        Ok(body.csrf_token)
    }

    async fn current_token(&self) -> ClientResult<String> {
        let cached = self.token.lock().await.clone();
        match cached {
            Some(token) => Ok(token),
            None => self.fetch_csrf_token().await,
        }
    }

    /// POST `body` as JSON to `path` and decode the response envelope
    ///
    /// Any status carrying an envelope is returned as a result. A
    /// `CSRF_VALIDATION_FAILED` answer is retried once with a fresh token.
    pub async fn post_json<B, D>(&self, path: &str, body: &B) -> ClientResult<SubmissionResult<D>>
    where
        B: Serialize + ?Sized,
        D: DeserializeOwned,
    {
        let token = self.current_token().await?;
        let result = self.send_json(path, body, &token).await?;

        let csrf_rejected = result
            .error()
            .is_some_and(|error| error.has_code(ErrorCode::CsrfValidationFailed));
        if !csrf_rejected {
            return Ok(result);
        }

        tracing::debug!(path, "CSRF token rejected, retrying with a fresh token");
        let token = self.fetch_csrf_token().await?;
        self.send_json(path, body, &token).await
    }

    async fn send_json<B, D>(
        &self,
        path: &str,
        body: &B,
        token: &str,
    ) -> ClientResult<SubmissionResult<D>>
    where
        B: Serialize + ?Sized,
        D: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.url(path))
            .header(ORIGIN, self.origin.as_str())
            .header(CSRF_HEADER, token)
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        serde_json::from_slice::<ApiResponse<D>>(&bytes).map_err(|e| {
            tracing::debug!(status, error = %e, "Response is not an API envelope");
            ClientError::UnexpectedResponse { status }
        })
    }
}
