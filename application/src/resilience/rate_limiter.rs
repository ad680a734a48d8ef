//! Shared token-bucket rate limiter for provider calls
//!
//! One limiter is shared by every worker of a run, and every provider call
//! (primary response or consistency sample) acquires a permit first. It is
//! the only cross-question mutable state of a run.

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::trace;

/// Requests per minute granted when nothing is configured
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 60;

/// Permits that may be taken back to back after an idle period
pub const DEFAULT_BURST: u32 = 5;

/// Rate limit settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Zero disables throttling
    pub requests_per_minute: u32,
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            burst: DEFAULT_BURST,
        }
    }
}

impl RateLimitConfig {
    pub fn is_unlimited(&self) -> bool {
        self.requests_per_minute == 0
    }
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket: holds up to `burst` permits, refilled at
/// `requests_per_minute / 60` permits per second.
#[derive(Debug)]
pub struct RateLimiter {
    capacity: f64,
    refill_per_sec: f64,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let capacity = config.burst.max(1) as f64;
        Self {
            capacity,
            refill_per_sec: config.requests_per_minute as f64 / 60.0,
            bucket: Mutex::new(Bucket {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// A limiter that never waits
    pub fn unlimited() -> Self {
        Self::new(RateLimitConfig {
            requests_per_minute: 0,
            burst: 1,
        })
    }

    fn is_unlimited(&self) -> bool {
        self.refill_per_sec <= 0.0
    }

    fn refill(&self, bucket: &mut Bucket, now: Instant) {
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        bucket.last_refill = now;
    }

    /// Wait until a permit is available and take it.
    ///
    /// The lock is released while sleeping, so waiters never block each
    /// other's refill checks.
    pub async fn acquire(&self) {
        if self.is_unlimited() {
            return;
        }
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                self.refill(&mut bucket, Instant::now());
                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    return;
                }
                Duration::from_secs_f64((1.0 - bucket.tokens) / self.refill_per_sec)
            };
            trace!("Rate limiter waiting {:?} for a permit", wait);
            tokio::time::sleep(wait).await;
        }
    }

    /// Take a permit if one is available right now; never waits.
    pub fn try_acquire(&self) -> bool {
        if self.is_unlimited() {
            return true;
        }
        let Ok(mut bucket) = self.bucket.try_lock() else {
            return false;
        };
        self.refill(&mut bucket, Instant::now());
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}
