//! Structured configuration issues
//!
//! Validation collects every problem it finds instead of stopping at the
//! first one, so the user sees the whole list at once.
//!
//! # Examples
//!
//! ```
//! use veracity_domain::config::{ConfigIssue, ConfigIssueCode, Severity};
//!
//! let issue = ConfigIssue::error(ConfigIssueCode::ZeroConcurrency, "run.concurrency must be at least 1");
//! assert!(issue.is_error());
//! ```

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the run works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A detector threshold lies outside [0, 1].
    ThresholdOutOfRange,
    /// A sampling temperature lies outside [0, 2].
    TemperatureOutOfRange,
    /// The worker pool would have no workers.
    ZeroConcurrency,
    /// A zero call deadline times out every provider call.
    ZeroTimeout,
    /// Throttling is disabled; provider rate limits will surface as 429s.
    ZeroRateLimit,
    /// Retrying is configured with zero attempts.
    ZeroRetryAttempts,
    /// The default provider is neither a preset nor a declared endpoint.
    UnknownDefaultProvider,
    /// Many consistency samples multiply provider cost.
    ExpensiveSampling,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_severity() {
        let warning = ConfigIssue::warning(ConfigIssueCode::ExpensiveSampling, "20 samples");
        assert_eq!(warning.severity, Severity::Warning);
        assert!(!warning.is_error());

        let error = ConfigIssue::error(ConfigIssueCode::ZeroConcurrency, "0 workers");
        assert!(error.is_error());
    }

    #[test]
    fn test_display() {
        let issue = ConfigIssue::error(ConfigIssueCode::ThresholdOutOfRange, "overlap 1.5");
        assert_eq!(issue.to_string(), "error: overlap 1.5");
    }
}
