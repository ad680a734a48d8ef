//! Domain layer for veracity
//!
//! This crate contains the decision logic of the benchmark: detectors,
//! ensemble voting and result aggregation. It has no dependencies on
//! infrastructure or presentation concerns, and no async runtime.
//!
//! # Core Concepts
//!
//! ## Detection
//!
//! Each (question, response) pair is examined by independent detectors:
//!
//! - **Token overlap**: is the expected answer in the response?
//! - **Self-consistency**: do re-sampled responses agree with each other?
//! - **Contradiction**: does the response contradict itself?
//!
//! ## Ensemble
//!
//! Detector verdicts are combined by a confidence-weighted vote into one
//! [`EnsembleVerdict`]. Detectors that could not run carry no weight.
//!
//! ## Aggregation
//!
//! [`ResultAggregator`] stratifies verdicts by category, difficulty and
//! trigger flag, and checks that hallucination rates rise with difficulty.

pub mod aggregate;
pub mod config;
pub mod core;
pub mod detection;
pub mod ensemble;
pub mod evaluation;
pub mod text;

// Re-export commonly used types
pub use aggregate::{BucketStats, DifficultyTrend, ResultAggregator, RunSummary, TrendStatus};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{
    error::DomainError,
    question::{Category, Difficulty, Question},
    response::ModelResponse,
};
pub use detection::{
    DetectionConfig, DetectionVerdict, DetectorKind, DetectorOutcome, HallucinationKind, Label,
};
pub use ensemble::{EnsembleCombiner, EnsembleVerdict};
pub use evaluation::{EvaluationRecord, EvaluationStatus};
pub use text::Normalizer;
