//! Evaluation parameters: run-loop control.
//!
//! [`EvaluationParams`] groups the parameters that control how a run talks
//! to its provider: worker count, generation settings, timeouts, retries and
//! rate limiting. Detector thresholds live in the domain's
//! [`DetectionConfig`].

use crate::resilience::{RateLimitConfig, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use veracity_domain::DetectionConfig;

/// Run-loop control parameters.
///
/// Used by [`RunBenchmarkUseCase`](crate::use_cases::run_benchmark::RunBenchmarkUseCase)
/// and [`EvaluateQuestionUseCase`](crate::use_cases::evaluate_question::EvaluateQuestionUseCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationParams {
    /// Questions evaluated at the same time.
    pub concurrency: usize,
    /// Temperature of the primary response.
    pub temperature: f64,
    /// Token cap of the primary response.
    pub max_tokens: u32,
    /// Token cap of each self-consistency sample.
    pub sample_max_tokens: u32,
    /// Deadline of any single provider call; a call past it is abandoned.
    pub call_timeout: Duration,
    pub retry: RetryPolicy,
    pub rate_limit: RateLimitConfig,
    pub detection: DetectionConfig,
}

impl Default for EvaluationParams {
    fn default() -> Self {
        Self {
            concurrency: 4,
            temperature: 0.7,
            max_tokens: 150,
            sample_max_tokens: 150,
            call_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            rate_limit: RateLimitConfig::default(),
            detection: DetectionConfig::default(),
        }
    }
}

impl EvaluationParams {
    // ==================== Builder Methods ====================

    pub fn with_concurrency(mut self, workers: usize) -> Self {
        self.concurrency = workers;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_sample_max_tokens(mut self, max_tokens: u32) -> Self {
        self.sample_max_tokens = max_tokens;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_detection(mut self, detection: DetectionConfig) -> Self {
        self.detection = detection;
        self
    }
}
