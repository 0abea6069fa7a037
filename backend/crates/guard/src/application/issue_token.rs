//! Issue CSRF Token Use Case

use crate::application::config::GuardConfig;
use crate::domain::entities::CsrfToken;
use crate::domain::services::sign_token;
use std::sync::Arc;

/// Output DTO for issue token
#[derive(Debug, Clone)]
pub struct IssueTokenOutput {
    /// Raw token for the `x-csrf-token` header
    pub token: String,
    /// Full `Set-Cookie` header value
    pub set_cookie: String,
    pub expires_at_ms: i64,
}

/// Issue CSRF Token Use Case
pub struct IssueCsrfTokenUseCase {
    config: Arc<GuardConfig>,
}

impl IssueCsrfTokenUseCase {
    pub fn new(config: Arc<GuardConfig>) -> Self {
        Self { config }
    }

    pub fn execute(&self, now_ms: i64) -> IssueTokenOutput {
        let csrf = &self.config.csrf;
        let token = CsrfToken::generate(csrf.token_ttl_ms(), now_ms);
        let set_cookie = csrf
            .cookie_config()
            .build_set_cookie(&sign_token(&token, &csrf.secret));

        tracing::info!(expires_at_ms = token.expires_at_ms, "Issued CSRF token");

        IssueTokenOutput {
            token: token.value,
            set_cookie,
            expires_at_ms: token.expires_at_ms,
        }
    }
}
