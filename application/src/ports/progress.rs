//! Progress notification port
//!
//! Defines the interface for reporting progress during a benchmark run.

use veracity_domain::{EvaluationRecord, RunSummary};

/// Callback for progress updates during a run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bar, plain lines, nothing).
/// Calls may come from several workers, in completion order.
pub trait EvaluationProgress: Send + Sync {
    /// Called once before the first question is dispatched
    fn on_run_start(&self, model: &str, total_questions: usize);

    /// Called when a question finishes, scored or failed
    fn on_question_complete(&self, record: &EvaluationRecord);

    /// Called once after the summary is computed
    fn on_run_complete(&self, _model: &str, _summary: &RunSummary) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl EvaluationProgress for NoProgress {
    fn on_run_start(&self, _model: &str, _total_questions: usize) {}
    fn on_question_complete(&self, _record: &EvaluationRecord) {}
}
