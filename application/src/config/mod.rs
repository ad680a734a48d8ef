//! Application-level configuration.
//!
//! - [`EvaluationParams`]: run-loop control (workers, generation settings,
//!   timeouts, retries, rate limiting, detector thresholds)

pub mod evaluation_params;

pub use evaluation_params::EvaluationParams;
