//! Bounded exponential-backoff retry for provider calls
//!
//! Transient errors (rate limit, timeout) are retried; permanent errors are
//! returned immediately. Instead of an error the caller must catch, the
//! result is a [`CallOutcome`] that says which of the three things happened.

use crate::ports::llm_provider::ProviderError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Result of a call made under a [`RetryPolicy`]
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome<T> {
    Success(T),
    /// Every attempt failed transiently; treat as a missing value
    Missing {
        attempts: u32,
        last_error: ProviderError,
    },
    /// A permanent error; not retried
    Failed(ProviderError),
}

impl<T> CallOutcome<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            CallOutcome::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ProviderError> {
        match self {
            CallOutcome::Success(_) => None,
            CallOutcome::Missing { last_error, .. } => Some(last_error),
            CallOutcome::Failed(err) => Some(err),
        }
    }

    /// One-line description of a failed outcome, for records and logs
    pub fn describe_failure(&self) -> Option<String> {
        match self {
            CallOutcome::Success(_) => None,
            CallOutcome::Missing {
                attempts,
                last_error,
            } => Some(format!("{} (gave up after {} attempts)", last_error, attempts)),
            CallOutcome::Failed(err) => Some(err.to_string()),
        }
    }
}

/// Retry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first; at least one is always made
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 500,
            backoff_multiplier: 2.0,
            max_backoff_ms: 8_000,
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no retries
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff_ms = backoff.as_millis() as u64;
        self
    }

    /// Delay before retry number `retry` (0-based), honoring a larger
    /// server-supplied `Retry-After`.
    pub fn backoff(&self, retry: u32, err: &ProviderError) -> Duration {
        let base = self.initial_backoff_ms as f64 * self.backoff_multiplier.powi(retry as i32);
        let computed = base.min(self.max_backoff_ms as f64).max(0.0) as u64;
        let computed = Duration::from_millis(computed);
        match err {
            ProviderError::RateLimited {
                retry_after: Some(server),
            } => computed.max(*server),
            _ => computed,
        }
    }

    /// Run `operation` until it succeeds, fails permanently, or the
    /// attempts run out.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> CallOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => return CallOutcome::Success(value),
                Err(err) if !err.is_transient() => return CallOutcome::Failed(err),
                Err(err) if attempt >= max_attempts => {
                    return CallOutcome::Missing {
                        attempts: attempt,
                        last_error: err,
                    };
                }
                Err(err) => {
                    let delay = self.backoff(attempt - 1, &err);
                    warn!(
                        attempt,
                        max = max_attempts,
                        backoff_ms = delay.as_millis() as u64,
                        error = %err,
                        "Retrying after transient provider error"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn fast() -> RetryPolicy {
        RetryPolicy::default().with_initial_backoff(Duration::from_millis(1))
    }

    fn scripted(
        results: Vec<Result<&'static str, ProviderError>>,
    ) -> (Mutex<VecDeque<Result<&'static str, ProviderError>>>, Mutex<u32>) {
        (Mutex::new(results.into()), Mutex::new(0))
    }

    #[tokio::test]
    async fn test_success_after_transient_errors() {
        let (queue, calls) = scripted(vec![
            Err(ProviderError::Timeout),
            Err(ProviderError::RateLimited { retry_after: None }),
            Ok("done"),
        ]);
        let outcome = fast()
            .run(|| {
                *calls.lock().unwrap() += 1;
                let next = queue.lock().unwrap().pop_front().unwrap();
                async move { next }
            })
            .await;
        assert_eq!(outcome, CallOutcome::Success("done"));
        assert_eq!(*calls.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_yields_missing() {
        let calls = Mutex::new(0u32);
        let outcome: CallOutcome<()> = fast()
            .run(|| {
                *calls.lock().unwrap() += 1;
                async { Err(ProviderError::Timeout) }
            })
            .await;
        assert_eq!(
            outcome,
            CallOutcome::Missing {
                attempts: 3,
                last_error: ProviderError::Timeout
            }
        );
        assert_eq!(*calls.lock().unwrap(), 3);
        assert!(outcome.describe_failure().unwrap().contains("3 attempts"));
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let calls = Mutex::new(0u32);
        let outcome: CallOutcome<()> = fast()
            .run(|| {
                *calls.lock().unwrap() += 1;
                async { Err(ProviderError::Permanent("401 unauthorized".to_string())) }
            })
            .await;
        assert!(matches!(outcome, CallOutcome::Failed(_)));
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let calls = Mutex::new(0u32);
        let outcome = fast()
            .with_max_attempts(0)
            .run(|| {
                *calls.lock().unwrap() += 1;
                async { Ok::<_, ProviderError>(1) }
            })
            .await;
        assert_eq!(outcome.ok(), Some(1));
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = RetryPolicy::default();
        let err = ProviderError::Timeout;
        assert_eq!(policy.backoff(0, &err), Duration::from_millis(500));
        assert_eq!(policy.backoff(1, &err), Duration::from_millis(1000));
        assert_eq!(policy.backoff(10, &err), Duration::from_millis(8000));
    }

    #[test]
    fn test_backoff_honors_retry_after() {
        let policy = RetryPolicy::default();
        let err = ProviderError::RateLimited {
            retry_after: Some(Duration::from_secs(3)),
        };
        assert_eq!(policy.backoff(0, &err), Duration::from_secs(3));
        // computed delay wins when it is larger
        assert_eq!(policy.backoff(4, &err), Duration::from_millis(8000));
    }
}
