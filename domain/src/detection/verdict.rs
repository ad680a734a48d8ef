//! Verdict primitives shared by every detector

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Classification of a single response
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    Correct,
    Hallucination,
    Uncertain,
}

impl Label {
    pub const ALL: [Label; 3] = [Label::Correct, Label::Hallucination, Label::Uncertain];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Correct => "CORRECT",
            Label::Hallucination => "HALLUCINATION",
            Label::Uncertain => "UNCERTAIN",
        }
    }

    pub fn is_hallucination(&self) -> bool {
        matches!(self, Label::Hallucination)
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The detectors taking part in the ensemble
///
/// Declaration order is the tie-break priority, most reliable first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    TokenOverlap,
    SelfConsistency,
    Contradiction,
}

impl DetectorKind {
    /// Lower value wins ties
    pub fn priority(&self) -> u8 {
        match self {
            DetectorKind::TokenOverlap => 0,
            DetectorKind::SelfConsistency => 1,
            DetectorKind::Contradiction => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorKind::TokenOverlap => "token_overlap",
            DetectorKind::SelfConsistency => "self_consistency",
            DetectorKind::Contradiction => "contradiction",
        }
    }
}

impl std::fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What kind of error a HALLUCINATION verdict points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HallucinationKind {
    /// Expected numbers missing or replaced
    NumericalError,
    /// Almost nothing of the expected answer present
    Fabrication,
    /// Partially related but wrong
    FactualError,
    /// Samples for the same question disagree
    Inconsistency,
    /// A statement and its negation in one response
    NegationConflict,
    /// Several numbers offered for a single-number question
    NumericConflict,
}

impl HallucinationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HallucinationKind::NumericalError => "numerical_error",
            HallucinationKind::Fabrication => "fabrication",
            HallucinationKind::FactualError => "factual_error",
            HallucinationKind::Inconsistency => "inconsistency",
            HallucinationKind::NegationConflict => "negation_conflict",
            HallucinationKind::NumericConflict => "numeric_conflict",
        }
    }
}

impl std::fmt::Display for HallucinationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One detector's verdict on one (question, response) pair
///
/// Created fresh per pair and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionVerdict {
    pub detector: DetectorKind,
    pub label: Label,
    /// Always within [0, 1]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<HallucinationKind>,
    /// Detector-specific audit data
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub evidence: Value,
}

impl DetectionVerdict {
    pub fn new(detector: DetectorKind, label: Label, confidence: f64) -> Self {
        Self {
            detector,
            label,
            confidence: clamp_unit(confidence),
            kind: None,
            evidence: Value::Null,
        }
    }

    pub fn correct(detector: DetectorKind, confidence: f64) -> Self {
        Self::new(detector, Label::Correct, confidence)
    }

    pub fn hallucination(detector: DetectorKind, confidence: f64, kind: HallucinationKind) -> Self {
        Self::new(detector, Label::Hallucination, confidence).with_kind(kind)
    }

    pub fn uncertain(detector: DetectorKind, confidence: f64) -> Self {
        Self::new(detector, Label::Uncertain, confidence)
    }

    pub fn with_kind(mut self, kind: HallucinationKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_evidence(mut self, evidence: Value) -> Self {
        self.evidence = evidence;
        self
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Why a detector did not vote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DetectorOutcome {
    /// The detector produced a verdict and votes with it
    Voted { verdict: DetectionVerdict },
    /// Prerequisites were unavailable (e.g. every sample failed)
    Unavailable {
        detector: DetectorKind,
        reason: String,
    },
    /// Disabled by configuration
    Skipped { detector: DetectorKind },
}

impl DetectorOutcome {
    pub fn voted(verdict: DetectionVerdict) -> Self {
        DetectorOutcome::Voted { verdict }
    }

    pub fn unavailable(detector: DetectorKind, reason: impl Into<String>) -> Self {
        DetectorOutcome::Unavailable {
            detector,
            reason: reason.into(),
        }
    }

    pub fn detector(&self) -> DetectorKind {
        match self {
            DetectorOutcome::Voted { verdict } => verdict.detector,
            DetectorOutcome::Unavailable { detector, .. } => *detector,
            DetectorOutcome::Skipped { detector } => *detector,
        }
    }

    pub fn verdict(&self) -> Option<&DetectionVerdict> {
        match self {
            DetectorOutcome::Voted { verdict } => Some(verdict),
            _ => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, DetectorOutcome::Unavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_clamped() {
        let v = DetectionVerdict::correct(DetectorKind::TokenOverlap, 1.5);
        assert_eq!(v.confidence, 1.0);
        let v = DetectionVerdict::uncertain(DetectorKind::TokenOverlap, -0.2);
        assert_eq!(v.confidence, 0.0);
        let v = DetectionVerdict::uncertain(DetectorKind::TokenOverlap, f64::NAN);
        assert_eq!(v.confidence, 0.0);
    }

    #[test]
    fn test_priority_order() {
        assert!(DetectorKind::TokenOverlap.priority() < DetectorKind::SelfConsistency.priority());
        assert!(DetectorKind::SelfConsistency.priority() < DetectorKind::Contradiction.priority());
    }

    #[test]
    fn test_label_serialization() {
        assert_eq!(
            serde_json::to_string(&Label::Hallucination).unwrap(),
            "\"HALLUCINATION\""
        );
        let parsed: Label = serde_json::from_str("\"UNCERTAIN\"").unwrap();
        assert_eq!(parsed, Label::Uncertain);
    }

    #[test]
    fn test_outcome_accessors() {
        let voted =
            DetectorOutcome::voted(DetectionVerdict::correct(DetectorKind::Contradiction, 0.5));
        assert_eq!(voted.detector(), DetectorKind::Contradiction);
        assert!(voted.verdict().is_some());

        let missing = DetectorOutcome::unavailable(DetectorKind::SelfConsistency, "no samples");
        assert!(missing.is_unavailable());
        assert!(missing.verdict().is_none());
    }

    #[test]
    fn test_outcome_round_trip_shape() {
        let outcome = DetectorOutcome::Skipped {
            detector: DetectorKind::SelfConsistency,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["detector"], "self_consistency");
    }
}
