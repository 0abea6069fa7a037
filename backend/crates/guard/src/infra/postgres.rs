//! PostgreSQL Counter Store
//!
//! Shared counters for multi-instance deployments. The window reset and the
//! increment are a single upsert, so concurrent instances never race on a
//! read-modify-write.

use sqlx::PgPool;

use crate::domain::entities::RateLimitCounter;
use crate::domain::repository::CounterStore;
use crate::error::GuardResult;

/// PostgreSQL-backed counter store
#[derive(Clone)]
pub struct PgCounterStore {
    pool: PgPool,
}

impl PgCounterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CounterRow {
    request_count: i32,
    window_start_ms: i64,
}

impl From<CounterRow> for RateLimitCounter {
    fn from(row: CounterRow) -> Self {
        RateLimitCounter {
            count: row.request_count.max(0) as u32,
            window_start_ms: row.window_start_ms,
        }
    }
}

impl CounterStore for PgCounterStore {
    async fn get(&self, key: &str) -> GuardResult<Option<RateLimitCounter>> {
        let row = sqlx::query_as::<_, CounterRow>(
            r#"
            SELECT request_count, window_start_ms
            FROM rate_limit_counters
            WHERE counter_key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn increment(
        &self,
        key: &str,
        now_ms: i64,
        window_ms: i64,
    ) -> GuardResult<RateLimitCounter> {
        let row = sqlx::query_as::<_, CounterRow>(
            r#"
            INSERT INTO rate_limit_counters (counter_key, request_count, window_start_ms)
            VALUES ($1, 1, $2)
            ON CONFLICT (counter_key) DO UPDATE SET
                request_count = CASE
                    WHEN rate_limit_counters.window_start_ms + $3 <= $2 THEN 1
                    ELSE LEAST(rate_limit_counters.request_count, 2147483646) + 1
                END,
                window_start_ms = CASE
                    WHEN rate_limit_counters.window_start_ms + $3 <= $2 THEN $2
                    ELSE rate_limit_counters.window_start_ms
                END
            RETURNING request_count, window_start_ms
            "#,
        )
        .bind(key)
        .bind(now_ms)
        .bind(window_ms)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn expire(&self, key: &str) -> GuardResult<()> {
        sqlx::query("DELETE FROM rate_limit_counters WHERE counter_key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn purge_expired(&self, now_ms: i64, window_ms: i64) -> GuardResult<u64> {
        let purged = sqlx::query("DELETE FROM rate_limit_counters WHERE window_start_ms + $2 <= $1")
            .bind(now_ms)
            .bind(window_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::debug!(purged, "Purged expired rate limit counters");
        Ok(purged)
    }
}
