//! Port for structured evaluation event logging.
//!
//! Defines the [`EvaluationLogger`] trait for recording evaluation events
//! (provider responses, verdicts, provider failures) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures every
//! scored exchange in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured evaluation event for logging.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. The adapter adds the timestamp.
pub struct EvaluationEvent {
    /// Event type identifier (e.g., "response", "verdict", "provider_failure").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl EvaluationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging evaluation events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// `log` is synchronous and infallible: a logging failure must never abort
/// an evaluation.
pub trait EvaluationLogger: Send + Sync {
    fn log(&self, event: EvaluationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoEvaluationLogger;

impl EvaluationLogger for NoEvaluationLogger {
    fn log(&self, _event: EvaluationEvent) {}
}
