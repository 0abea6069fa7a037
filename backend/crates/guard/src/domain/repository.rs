//! Repository Traits
//!
//! Interfaces for counter persistence. Implementations are in the infra layer.

use crate::domain::entities::RateLimitCounter;
use crate::error::GuardResult;

/// Rate limit counter store
///
/// `increment` must be atomic per key: the window reset and the increment
/// happen in one step, so concurrent requests from the same identity are
/// never double-counted into a stale window.
#[trait_variant::make(CounterStore: Send)]
pub trait LocalCounterStore {
    /// Current counter for a key, if any
    async fn get(&self, key: &str) -> GuardResult<Option<RateLimitCounter>>;

    /// Count one request, opening a new window at `now_ms` if the current
    /// one has elapsed. Returns the counter after the increment.
    async fn increment(
        &self,
        key: &str,
        now_ms: i64,
        window_ms: i64,
    ) -> GuardResult<RateLimitCounter>;

    /// Drop a key's counter
    async fn expire(&self, key: &str) -> GuardResult<()>;

    /// Drop every counter whose window has elapsed; returns how many
    async fn purge_expired(&self, now_ms: i64, window_ms: i64) -> GuardResult<u64>;
}
