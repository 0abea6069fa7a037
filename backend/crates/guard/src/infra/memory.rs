//! In-memory Counter Store
//!
//! Per-process counters in a `DashMap`. Counters are lost on restart and are
//! not shared between instances; use [`PgCounterStore`](super::postgres::PgCounterStore)
//! when running more than one instance.

use dashmap::DashMap;

use crate::domain::entities::RateLimitCounter;
use crate::domain::repository::CounterStore;
use crate::error::GuardResult;

/// In-memory counter store
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    counters: DashMap<String, RateLimitCounter>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked keys
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

impl CounterStore for MemoryCounterStore {
    async fn get(&self, key: &str) -> GuardResult<Option<RateLimitCounter>> {
        Ok(self.counters.get(key).map(|entry| *entry))
    }

    async fn increment(
        &self,
        key: &str,
        now_ms: i64,
        window_ms: i64,
    ) -> GuardResult<RateLimitCounter> {
        // The entry guard holds the shard lock for the read-modify-write
        let counter = *self
            .counters
            .entry(key.to_string())
            .and_modify(|counter| *counter = counter.incremented(now_ms, window_ms))
            .or_insert_with(|| RateLimitCounter::start(now_ms));
        Ok(counter)
    }

    async fn expire(&self, key: &str) -> GuardResult<()> {
        self.counters.remove(key);
        Ok(())
    }

    async fn purge_expired(&self, now_ms: i64, window_ms: i64) -> GuardResult<u64> {
        let before = self.counters.len();
        self.counters
            .retain(|_, counter| !counter.window_elapsed(now_ms, window_ms));
        let purged = before.saturating_sub(self.counters.len()) as u64;

        if purged > 0 {
            tracing::debug!(purged, "Purged expired rate limit counters");
        }
        Ok(purged)
    }
}
