//! Check Rate Limit Use Case

use chrono::Utc;
use platform::client::ClientIdentity;
use platform::rate_limit::RateLimitResult;
use std::sync::Arc;

use crate::application::config::GuardConfig;
use crate::domain::repository::CounterStore;
use crate::error::{GuardError, GuardResult};

/// Check Rate Limit Use Case
pub struct CheckRateLimitUseCase<S>
where
    S: CounterStore,
{
    store: Arc<S>,
    config: Arc<GuardConfig>,
}

impl<S> CheckRateLimitUseCase<S>
where
    S: CounterStore,
{
    pub fn new(store: Arc<S>, config: Arc<GuardConfig>) -> Self {
        Self { store, config }
    }

    /// Count a request for `identity` now
    pub async fn check(&self, identity: &ClientIdentity) -> GuardResult<RateLimitResult> {
        self.check_at(identity, Utc::now().timestamp_millis()).await
    }

    /// Count a request for `identity` at `now_ms`
    ///
    /// Returns `RateLimited` once the count exceeds the threshold within the
    /// current window.
    pub async fn check_at(
        &self,
        identity: &ClientIdentity,
        now_ms: i64,
    ) -> GuardResult<RateLimitResult> {
        let limits = &self.config.rate_limit;
        let counter = self
            .store
            .increment(&identity.key(), now_ms, limits.window_ms())
            .await?;

        let result = limits.evaluate(&counter, now_ms);
        if !result.allowed {
            tracing::warn!(
                identity = %identity,
                count = counter.count,
                retry_after_secs = result.retry_after_secs,
                "Rate limit hit"
            );
            return Err(GuardError::RateLimited {
                retry_after_secs: result.retry_after_secs,
            });
        }

        Ok(result)
    }
}
