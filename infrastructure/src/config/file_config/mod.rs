//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain and application types
//! where the file format and the runtime type coincide.

mod output;
mod providers;
mod run;

pub use output::FileOutputConfig;
pub use providers::{FileEndpointConfig, FileProvidersConfig, ResolvedEndpoint, PRESETS};
pub use run::FileRunConfig;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use veracity_application::{EvaluationParams, RateLimitConfig, RetryPolicy};
use veracity_domain::{ConfigIssue, ConfigIssueCode, DetectionConfig};

/// Sample counts above this only add cost
const EXPENSIVE_SAMPLE_COUNT: usize = 10;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Detector thresholds
    pub detection: DetectionConfig,
    /// Run loop settings
    pub run: FileRunConfig,
    /// Retry policy for transient provider errors
    pub retry: RetryPolicy,
    /// Shared request throttling
    pub rate_limit: RateLimitConfig,
    /// Provider endpoints and the default target
    pub providers: FileProvidersConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Errors make the configuration unusable; warnings are printed and the
    /// run continues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        for (field, value) in [
            ("detection.overlap_threshold", self.detection.overlap_threshold),
            ("detection.similarity_threshold", self.detection.similarity_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ThresholdOutOfRange,
                    format!("{} must lie in [0, 1], got {}", field, value),
                ));
            }
        }

        for (field, value) in [
            ("run.temperature", self.run.temperature),
            ("detection.sampling_temperature", self.detection.sampling_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::TemperatureOutOfRange,
                    format!("{} must lie in [0, 2], got {}", field, value),
                ));
            }
        }

        if self.run.concurrency == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroConcurrency,
                "run.concurrency must be at least 1",
            ));
        }

        if self.run.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "run.timeout_secs must be at least 1",
            ));
        }

        if self.rate_limit.is_unlimited() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroRateLimit,
                "rate_limit.requests_per_minute is 0; requests are not throttled",
            ));
        }

        if self.retry.max_attempts == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroRetryAttempts,
                "retry.max_attempts is 0; every call is attempted once",
            ));
        }

        if !self.providers.is_known(&self.providers.default) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::UnknownDefaultProvider,
                format!(
                    "providers.default '{}' is not a preset or a [providers.endpoints] entry",
                    self.providers.default
                ),
            ));
        }

        if self.detection.consistency_samples > EXPENSIVE_SAMPLE_COUNT {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ExpensiveSampling,
                format!(
                    "detection.consistency_samples = {} requests {} extra calls per question",
                    self.detection.consistency_samples, self.detection.consistency_samples
                ),
            ));
        }

        issues
    }

    /// Build the application's run parameters from the file values.
    pub fn to_evaluation_params(&self) -> EvaluationParams {
        EvaluationParams::default()
            .with_concurrency(self.run.concurrency)
            .with_temperature(self.run.temperature)
            .with_max_tokens(self.run.max_tokens)
            .with_sample_max_tokens(self.run.sample_max_tokens)
            .with_call_timeout(Duration::from_secs(self.run.timeout_secs))
            .with_retry(self.retry.clone())
            .with_rate_limit(self.rate_limit)
            .with_detection(self.detection.clone())
    }
}
