//! HTTP Handlers

use crate::application::config::GuardConfig;
use crate::application::issue_token::IssueCsrfTokenUseCase;
use crate::domain::repository::CounterStore;
use crate::presentation::dto::CsrfTokenResponse;
use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use chrono::Utc;
use std::sync::Arc;

/// Shared state for guard handlers and middleware
pub struct GuardState<S>
where
    S: CounterStore + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub config: Arc<GuardConfig>,
}

impl<S> GuardState<S>
where
    S: CounterStore + Send + Sync + 'static,
{
    pub fn new(store: S, config: GuardConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}

impl<S> Clone for GuardState<S>
where
    S: CounterStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

/// GET /api/csrf-token
pub async fn issue_csrf_token<S>(State(state): State<GuardState<S>>) -> impl IntoResponse
where
    S: CounterStore + Send + Sync + 'static,
{
    let use_case = IssueCsrfTokenUseCase::new(state.config.clone());
    let output = use_case.execute(Utc::now().timestamp_millis());

    (
        StatusCode::OK,
        [
            (header::SET_COOKIE, output.set_cookie),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        Json(CsrfTokenResponse {
            csrf_token: output.token,
        }),
    )
}
