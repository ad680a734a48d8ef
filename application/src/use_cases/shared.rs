//! Shared utilities for use cases.
//!
//! Contains the guarded provider call used by both the primary response and
//! every self-consistency sample: permit, deadline, retry.

use crate::ports::llm_provider::{Generation, GenerationRequest, LlmProvider, ProviderError};
use crate::resilience::{CallOutcome, RateLimiter, RetryPolicy};
use std::sync::Arc;
use std::time::Duration;

/// A provider plus the policies every call to it must respect
#[derive(Clone)]
pub(crate) struct ProviderCaller {
    provider: Arc<dyn LlmProvider>,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
    timeout: Duration,
}

impl ProviderCaller {
    pub(crate) fn new(
        provider: Arc<dyn LlmProvider>,
        limiter: Arc<RateLimiter>,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            limiter,
            retry,
            timeout,
        }
    }

    pub(crate) fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Each attempt acquires its own permit; a call past the deadline is
    /// dropped and counts as a timeout.
    pub(crate) async fn call(&self, request: &GenerationRequest) -> CallOutcome<Generation> {
        let this = self;
        self.retry
            .run(move || async move {
                this.limiter.acquire().await;
                match tokio::time::timeout(this.timeout, this.provider.generate(request)).await {
                    Ok(result) => result,
                    Err(_) => Err(ProviderError::Timeout),
                }
            })
            .await
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn caller(provider: Arc<ScriptedProvider>, timeout: Duration) -> ProviderCaller {
        ProviderCaller::new(
            provider,
            Arc::new(RateLimiter::unlimited()),
            RetryPolicy::default().with_initial_backoff(Duration::from_millis(1)),
            timeout,
        )
    }

    #[tokio::test]
    async fn test_slow_call_times_out_then_retries() {
        let provider = Arc::new(ScriptedProvider::new().script(
            "q",
            vec![
                Scripted::Slow(Duration::from_millis(500), "late".to_string()),
                text("on time"),
            ],
        ));
        let outcome = caller(Arc::clone(&provider), Duration::from_millis(50))
            .call(&GenerationRequest::new("q", 0.7, 10))
            .await;
        assert_eq!(outcome.ok().map(|g| g.text), Some("on time".to_string()));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_permanent_failure_surfaces() {
        let provider = Arc::new(ScriptedProvider::new());
        let outcome = caller(provider, Duration::from_secs(1))
            .call(&GenerationRequest::new("unscripted", 0.7, 10))
            .await;
        assert!(matches!(outcome, CallOutcome::Failed(ProviderError::Permanent(_))));
    }
}
