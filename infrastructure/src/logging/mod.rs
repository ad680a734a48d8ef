//! Logging infrastructure: structured evaluation event logging.
//!
//! Provides [`JsonlEvaluationLogger`], a JSONL file writer that implements
//! the [`EvaluationLogger`](veracity_application::EvaluationLogger) port.

mod jsonl_event_log;

pub use jsonl_event_log::JsonlEvaluationLogger;
