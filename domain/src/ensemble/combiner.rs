//! Weighted-vote combination of detector outcomes

use super::tally::{LabelWeights, TIE_EPSILON, Tally};
use crate::detection::{DetectionVerdict, DetectorOutcome, HallucinationKind, Label};
use serde::{Deserialize, Serialize};

/// Final verdict for one response
///
/// `label` and `confidence` are always derivable from `contributions`
/// alone; see [`EnsembleVerdict::is_consistent`].
///
/// # Example
///
/// ```
/// use veracity_domain::detection::{DetectionVerdict, DetectorKind, DetectorOutcome, Label};
/// use veracity_domain::ensemble::EnsembleCombiner;
///
/// let verdict = EnsembleCombiner::new().combine(vec![
///     DetectorOutcome::voted(DetectionVerdict::correct(DetectorKind::TokenOverlap, 1.0)),
///     DetectorOutcome::voted(DetectionVerdict::correct(DetectorKind::Contradiction, 0.5)),
///     DetectorOutcome::unavailable(DetectorKind::SelfConsistency, "all samples failed"),
/// ]);
/// assert_eq!(verdict.label, Label::Correct);
/// assert_eq!(verdict.confidence, 1.0);
/// assert_eq!(verdict.excluded.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleVerdict {
    pub label: Label,
    /// Winning weight over total weight, in [0, 1]
    pub confidence: f64,
    pub weights: LabelWeights,
    /// Voting detectors, highest priority first
    pub contributions: Vec<DetectionVerdict>,
    /// Detectors that did not vote, with the reason
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<DetectorOutcome>,
    /// Error type of the strongest HALLUCINATION contributor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_kind: Option<HallucinationKind>,
}

impl EnsembleVerdict {
    pub fn is_hallucination(&self) -> bool {
        self.label.is_hallucination()
    }

    /// Re-runs the vote over `contributions` and checks it reproduces
    /// `label` and `confidence`.
    pub fn is_consistent(&self) -> bool {
        let (label, confidence) = decide(&Tally::from_verdicts(&self.contributions));
        label == self.label && (confidence - self.confidence).abs() <= TIE_EPSILON
    }
}

/// Combines detector outcomes into one [`EnsembleVerdict`]
///
/// Each voting detector adds its confidence to its own label and the
/// heaviest label wins. Ties go to the label backed by the
/// highest-priority detector. Unavailable and skipped detectors carry no
/// weight. With no weight cast at all the result is UNCERTAIN with
/// confidence 0.
#[derive(Debug, Clone, Default)]
pub struct EnsembleCombiner;

impl EnsembleCombiner {
    pub fn new() -> Self {
        Self
    }

    pub fn combine(&self, outcomes: Vec<DetectorOutcome>) -> EnsembleVerdict {
        let mut contributions = Vec::new();
        let mut excluded = Vec::new();
        for outcome in outcomes {
            match outcome {
                DetectorOutcome::Voted { verdict } => contributions.push(verdict),
                other => excluded.push(other),
            }
        }
        contributions.sort_by_key(|v| v.detector.priority());
        excluded.sort_by_key(|o| o.detector().priority());

        let tally = Tally::from_verdicts(&contributions);
        let (label, confidence) = decide(&tally);
        let primary_kind = if label.is_hallucination() {
            primary_kind(&contributions)
        } else {
            None
        };

        EnsembleVerdict {
            label,
            confidence,
            weights: tally.weights(),
            contributions,
            excluded,
            primary_kind,
        }
    }
}

fn decide(tally: &Tally) -> (Label, f64) {
    tally.winner().unwrap_or((Label::Uncertain, 0.0))
}

fn primary_kind(contributions: &[DetectionVerdict]) -> Option<HallucinationKind> {
    // contributions are priority-ordered, so the first of equal weight wins
    let mut best: Option<&DetectionVerdict> = None;
    for verdict in contributions
        .iter()
        .filter(|v| v.label.is_hallucination() && v.kind.is_some())
    {
        if best.is_none_or(|b| verdict.confidence > b.confidence + TIE_EPSILON) {
            best = Some(verdict);
        }
    }
    best.and_then(|v| v.kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::DetectorKind;

    fn voted(verdict: DetectionVerdict) -> DetectorOutcome {
        DetectorOutcome::voted(verdict)
    }

    #[test]
    fn test_unanimous_correct() {
        let verdict = EnsembleCombiner::new().combine(vec![
            voted(DetectionVerdict::correct(DetectorKind::TokenOverlap, 1.0)),
            voted(DetectionVerdict::correct(DetectorKind::SelfConsistency, 1.0)),
            voted(DetectionVerdict::correct(DetectorKind::Contradiction, 0.5)),
        ]);
        assert_eq!(verdict.label, Label::Correct);
        assert_eq!(verdict.confidence, 1.0);
        assert!(verdict.primary_kind.is_none());
        assert!(verdict.is_consistent());
    }

    #[test]
    fn test_majority_hallucination_with_kind() {
        let verdict = EnsembleCombiner::new().combine(vec![
            voted(DetectionVerdict::correct(DetectorKind::Contradiction, 0.5)),
            voted(DetectionVerdict::hallucination(
                DetectorKind::SelfConsistency,
                1.0,
                HallucinationKind::Inconsistency,
            )),
            voted(DetectionVerdict::hallucination(
                DetectorKind::TokenOverlap,
                1.0,
                HallucinationKind::NumericalError,
            )),
        ]);
        assert_eq!(verdict.label, Label::Hallucination);
        assert!((verdict.confidence - 0.8).abs() < 1e-9);
        // equal weight: token overlap has priority
        assert_eq!(verdict.primary_kind, Some(HallucinationKind::NumericalError));
        assert_eq!(verdict.contributions[0].detector, DetectorKind::TokenOverlap);
        assert!(verdict.is_consistent());
    }

    #[test]
    fn test_no_votes_is_uncertain_zero() {
        let verdict = EnsembleCombiner::new().combine(vec![
            DetectorOutcome::Skipped {
                detector: DetectorKind::SelfConsistency,
            },
        ]);
        assert_eq!(verdict.label, Label::Uncertain);
        assert_eq!(verdict.confidence, 0.0);
        assert!(verdict.contributions.is_empty());
    }

    #[test]
    fn test_all_zero_weights_is_uncertain_zero() {
        let verdict = EnsembleCombiner::new().combine(vec![voted(DetectionVerdict::correct(
            DetectorKind::TokenOverlap,
            0.0,
        ))]);
        assert_eq!(verdict.label, Label::Uncertain);
        assert_eq!(verdict.confidence, 0.0);
        assert!(verdict.is_consistent());
    }

    #[test]
    fn test_unavailable_detector_carries_no_weight() {
        let with_missing = EnsembleCombiner::new().combine(vec![
            voted(DetectionVerdict::uncertain(DetectorKind::TokenOverlap, 0.75)),
            voted(DetectionVerdict::correct(DetectorKind::Contradiction, 0.5)),
            DetectorOutcome::unavailable(DetectorKind::SelfConsistency, "all samples failed"),
        ]);
        let without = EnsembleCombiner::new().combine(vec![
            voted(DetectionVerdict::uncertain(DetectorKind::TokenOverlap, 0.75)),
            voted(DetectionVerdict::correct(DetectorKind::Contradiction, 0.5)),
        ]);
        assert_eq!(with_missing.label, without.label);
        assert_eq!(with_missing.confidence, without.confidence);
        assert_eq!(with_missing.weights, without.weights);
        assert_eq!(with_missing.excluded.len(), 1);
        assert!(with_missing.excluded[0].is_unavailable());
    }

    #[test]
    fn test_tamper_detected_by_consistency_check() {
        let mut verdict = EnsembleCombiner::new().combine(vec![voted(
            DetectionVerdict::correct(DetectorKind::TokenOverlap, 1.0),
        )]);
        verdict.label = Label::Hallucination;
        assert!(!verdict.is_consistent());
    }

    #[test]
    fn test_serialized_shape() {
        let verdict = EnsembleCombiner::new().combine(vec![voted(DetectionVerdict::hallucination(
            DetectorKind::Contradiction,
            0.8,
            HallucinationKind::NegationConflict,
        ))]);
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["label"], "HALLUCINATION");
        assert_eq!(json["primary_kind"], "negation_conflict");
        assert!(json.get("excluded").is_none());
    }
}
