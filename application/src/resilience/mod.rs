//! Provider-call resilience: shared rate limiting and bounded retries

pub mod rate_limiter;
pub mod retry;

pub use rate_limiter::{RateLimitConfig, RateLimiter};
pub use retry::{CallOutcome, RetryPolicy};
