//! Rate Limiting Infrastructure
//!
//! Fixed-window counting shared by every counter store. Time is passed in
//! explicitly (milliseconds since the Unix epoch) so the window arithmetic is
//! identical whether the counter lives in memory or in a database row.

use std::time::Duration;

/// Rate limit configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

/// Invalid rate limit configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitConfigError {
    #[error("max_requests must be greater than 0")]
    ZeroMaxRequests,
    #[error("window must be at least one millisecond")]
    ZeroWindow,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 20,
            window: Duration::from_secs(10),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window: Duration) -> Result<Self, RateLimitConfigError> {
        if max_requests == 0 {
            return Err(RateLimitConfigError::ZeroMaxRequests);
        }
        if window.as_millis() == 0 {
            return Err(RateLimitConfigError::ZeroWindow);
        }
        Ok(Self {
            max_requests,
            window,
        })
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }

    /// Decide on a request given the counter *after* it was incremented
    pub fn evaluate(&self, counter: &RateLimitCounter, now_ms: i64) -> RateLimitResult {
        let reset_at_ms = counter.reset_at_ms(self.window_ms());
        if counter.count > self.max_requests {
            return RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_at_ms,
                retry_after_secs: retry_after_secs(reset_at_ms, now_ms),
            };
        }
        RateLimitResult {
            allowed: true,
            remaining: self.max_requests - counter.count,
            reset_at_ms,
            retry_after_secs: 0,
        }
    }
}

/// Per-identity counter state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitCounter {
    /// Requests seen in the current window
    pub count: u32,
    /// Start of the current window
    pub window_start_ms: i64,
}

impl RateLimitCounter {
    /// First request of a fresh window
    pub fn start(now_ms: i64) -> Self {
        Self {
            count: 1,
            window_start_ms: now_ms,
        }
    }

    pub fn window_elapsed(&self, now_ms: i64, window_ms: i64) -> bool {
        now_ms >= self.window_start_ms.saturating_add(window_ms)
    }

    /// Count one more request, restarting the window if it has elapsed
    pub fn incremented(self, now_ms: i64, window_ms: i64) -> Self {
        if self.window_elapsed(now_ms, window_ms) {
            Self::start(now_ms)
        } else {
            Self {
                count: self.count.saturating_add(1),
                window_start_ms: self.window_start_ms,
            }
        }
    }

    pub fn reset_at_ms(&self, window_ms: i64) -> i64 {
        self.window_start_ms.saturating_add(window_ms)
    }
}

/// Rate limit check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: i64,
    /// Whole seconds until the window resets; 0 when allowed
    pub retry_after_secs: u64,
}

/// Remaining window time rounded up to whole seconds, at least 1
fn retry_after_secs(reset_at_ms: i64, now_ms: i64) -> u64 {
    let remaining_ms = reset_at_ms.saturating_sub(now_ms).max(0) as u64;
    remaining_ms.div_ceil(1000).max(1)
}
