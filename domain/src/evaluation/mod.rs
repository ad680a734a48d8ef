//! Evaluation records

pub mod record;

pub use record::{EvaluationRecord, EvaluationStatus};
