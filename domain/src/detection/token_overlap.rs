//! Expected-answer token overlap verification
//!
//! Policy, in order:
//!
//! 1. No expected tokens → UNCERTAIN (no ground truth).
//! 2. Every expected token present in the prediction → CORRECT, confidence 1.0,
//!    whatever else the prediction says.
//! 3. Overlap ratio ≥ threshold → UNCERTAIN, confidence = ratio.
//! 4. Otherwise → HALLUCINATION, confidence = 1 − ratio.
//!
//! Both sides are normalized first, so trailing punctuation never turns an
//! exact answer into a mismatch.

use super::config::{DEFAULT_OVERLAP_THRESHOLD, FABRICATION_OVERLAP};
use super::verdict::{DetectionVerdict, DetectorKind, HallucinationKind};
use crate::text::{Normalizer, numbers};
use serde_json::json;
use std::collections::HashSet;

/// Fraction of `reference` tokens also present in `candidate`.
///
/// Returns 0.0 when `reference` is empty.
pub fn overlap_ratio(reference: &HashSet<&str>, candidate: &HashSet<&str>) -> f64 {
    if reference.is_empty() {
        return 0.0;
    }
    let shared = reference.intersection(candidate).count();
    shared as f64 / reference.len() as f64
}

/// Compares a predicted answer against the expected answer
///
/// # Example
///
/// ```
/// use veracity_domain::detection::{Label, TokenOverlapVerifier};
///
/// let verifier = TokenOverlapVerifier::default();
/// let verdict = verifier.verify("The capital is Paris.", "Paris");
/// assert_eq!(verdict.label, Label::Correct);
/// assert_eq!(verdict.confidence, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct TokenOverlapVerifier {
    threshold: f64,
}

impl Default for TokenOverlapVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_OVERLAP_THRESHOLD)
    }
}

impl TokenOverlapVerifier {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn verify(&self, predicted: &str, expected: &str) -> DetectionVerdict {
        let predicted_tokens = Normalizer::tokens(predicted);
        let expected_tokens = Normalizer::tokens(expected);

        let predicted_set: HashSet<&str> = predicted_tokens.iter().map(String::as_str).collect();
        let expected_set: HashSet<&str> = expected_tokens.iter().map(String::as_str).collect();

        if expected_set.is_empty() {
            return DetectionVerdict::uncertain(DetectorKind::TokenOverlap, 1.0).with_evidence(
                json!({ "reason": "empty_ground_truth", "predicted_tokens": predicted_set.len() }),
            );
        }

        let ratio = overlap_ratio(&expected_set, &predicted_set);
        let evidence = json!({
            "overlap_ratio": ratio,
            "matched_tokens": expected_set.intersection(&predicted_set).count(),
            "expected_tokens": expected_set.len(),
            "threshold": self.threshold,
        });

        if expected_set.is_subset(&predicted_set) {
            return DetectionVerdict::correct(DetectorKind::TokenOverlap, 1.0)
                .with_evidence(evidence);
        }

        if ratio >= self.threshold {
            return DetectionVerdict::uncertain(DetectorKind::TokenOverlap, ratio)
                .with_evidence(evidence);
        }

        let kind = classify_mismatch(&expected_tokens, &predicted_tokens, ratio);
        DetectionVerdict::hallucination(DetectorKind::TokenOverlap, 1.0 - ratio, kind)
            .with_evidence(evidence)
    }
}

fn classify_mismatch(expected: &[String], predicted: &[String], ratio: f64) -> HallucinationKind {
    let expected_numbers: HashSet<&str> = numbers::digit_tokens(expected).into_iter().collect();
    if !expected_numbers.is_empty() {
        let predicted_numbers: HashSet<&str> =
            numbers::digit_tokens(predicted).into_iter().collect();
        if expected_numbers != predicted_numbers {
            return HallucinationKind::NumericalError;
        }
    }
    if ratio < FABRICATION_OVERLAP {
        HallucinationKind::Fabrication
    } else {
        HallucinationKind::FactualError
    }
}
