//! Per-question evaluation record

use crate::core::question::Question;
use crate::core::response::ModelResponse;
use crate::ensemble::EnsembleVerdict;
use serde::{Deserialize, Serialize};

/// How far a question got through evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    /// Scored with every enabled detector
    Complete,
    /// Scored, but at least one detector was excluded after provider failures
    Degraded,
    /// The primary response could not be obtained; not scored
    Failed,
}

impl EvaluationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationStatus::Complete => "complete",
            EvaluationStatus::Degraded => "degraded",
            EvaluationStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything known about one question after evaluation
///
/// Records are what gets persisted; aggregate statistics can always be
/// rebuilt from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub question: Question,
    pub status: EvaluationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ModelResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<EnsembleVerdict>,
    /// Provider errors met along the way, including recovered ones
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl EvaluationRecord {
    /// A scored question; status follows from whether a detector had to be
    /// excluded.
    pub fn scored(question: Question, response: ModelResponse, verdict: EnsembleVerdict) -> Self {
        let status = if verdict.excluded.iter().any(|o| o.is_unavailable()) {
            EvaluationStatus::Degraded
        } else {
            EvaluationStatus::Complete
        };
        Self {
            question,
            status,
            response: Some(response),
            verdict: Some(verdict),
            errors: Vec::new(),
        }
    }

    /// A question whose primary response could not be obtained
    pub fn failed(question: Question, error: impl Into<String>) -> Self {
        Self {
            question,
            status: EvaluationStatus::Failed,
            response: None,
            verdict: None,
            errors: vec![error.into()],
        }
    }

    pub fn with_errors(mut self, errors: impl IntoIterator<Item = String>) -> Self {
        self.errors.extend(errors);
        self
    }

    /// The verdict, unless the record failed
    pub fn scored_verdict(&self) -> Option<(&ModelResponse, &EnsembleVerdict)> {
        match self.status {
            EvaluationStatus::Failed => None,
            _ => self.response.as_ref().zip(self.verdict.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{DetectionVerdict, DetectorKind, DetectorOutcome};
    use crate::ensemble::EnsembleCombiner;

    fn question() -> Question {
        Question::new("q1", "What is the capital of France?", "Paris").unwrap()
    }

    fn response() -> ModelResponse {
        ModelResponse::new("Paris", 12.0, 1)
    }

    #[test]
    fn test_scored_complete() {
        let verdict = EnsembleCombiner::new().combine(vec![DetectorOutcome::voted(
            DetectionVerdict::correct(DetectorKind::TokenOverlap, 1.0),
        )]);
        let record = EvaluationRecord::scored(question(), response(), verdict);
        assert_eq!(record.status, EvaluationStatus::Complete);
        assert!(record.scored_verdict().is_some());
    }

    #[test]
    fn test_unavailable_detector_marks_degraded() {
        let verdict = EnsembleCombiner::new().combine(vec![
            DetectorOutcome::voted(DetectionVerdict::correct(DetectorKind::TokenOverlap, 1.0)),
            DetectorOutcome::unavailable(DetectorKind::SelfConsistency, "all samples failed"),
        ]);
        let record = EvaluationRecord::scored(question(), response(), verdict)
            .with_errors(vec!["timeout".to_string()]);
        assert_eq!(record.status, EvaluationStatus::Degraded);
        assert_eq!(record.errors, vec!["timeout".to_string()]);
    }

    #[test]
    fn test_skipped_detector_is_not_degraded() {
        let verdict = EnsembleCombiner::new().combine(vec![
            DetectorOutcome::voted(DetectionVerdict::correct(DetectorKind::TokenOverlap, 1.0)),
            DetectorOutcome::Skipped {
                detector: DetectorKind::SelfConsistency,
            },
        ]);
        let record = EvaluationRecord::scored(question(), response(), verdict);
        assert_eq!(record.status, EvaluationStatus::Complete);
    }

    #[test]
    fn test_failed_record_shape() {
        let record = EvaluationRecord::failed(question(), "permanent provider error: 401");
        assert!(record.scored_verdict().is_none());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "failed");
        assert!(json.get("response").is_none());
        assert_eq!(json["question"]["id"], "q1");

        let back: EvaluationRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
