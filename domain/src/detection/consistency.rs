//! Agreement scoring for self-consistency sampling
//!
//! The sampling itself needs a provider and lives in the application layer.
//! This module only turns a set of texts into an agreement score and a
//! verdict, so it stays a pure function of its inputs.

use super::config::{
    DEFAULT_SIMILARITY_THRESHOLD, HIGH_AGREEMENT, LOW_AGREEMENT, UNCERTAIN_AGREEMENT_CONFIDENCE,
};
use super::token_overlap::overlap_ratio;
use super::verdict::{DetectionVerdict, DetectorKind, HallucinationKind};
use crate::text::Normalizer;
use serde_json::json;
use std::collections::HashSet;

/// Symmetric similarity of two texts.
///
/// The overlap ratio taken against the shorter token set, so an answer that
/// is contained in a wordier one scores 1.0. Empty text never matches.
pub fn pair_similarity(a: &str, b: &str) -> f64 {
    let a_tokens = Normalizer::tokens(a);
    let b_tokens = Normalizer::tokens(b);
    let a_set: HashSet<&str> = a_tokens.iter().map(String::as_str).collect();
    let b_set: HashSet<&str> = b_tokens.iter().map(String::as_str).collect();
    if a_set.is_empty() || b_set.is_empty() {
        return 0.0;
    }
    if a_set.len() <= b_set.len() {
        overlap_ratio(&a_set, &b_set)
    } else {
        overlap_ratio(&b_set, &a_set)
    }
}

/// Fraction of text pairs whose similarity exceeds `similarity_threshold`.
///
/// Returns `None` for fewer than two texts: there is no pair to compare.
pub fn agreement_score(texts: &[&str], similarity_threshold: f64) -> Option<f64> {
    if texts.len() < 2 {
        return None;
    }
    let mut pairs = 0usize;
    let mut agreeing = 0usize;
    for i in 0..texts.len() {
        for j in (i + 1)..texts.len() {
            pairs += 1;
            if pair_similarity(texts[i], texts[j]) > similarity_threshold {
                agreeing += 1;
            }
        }
    }
    Some(agreeing as f64 / pairs as f64)
}

/// Turns an original response plus its extra samples into a verdict
#[derive(Debug, Clone)]
pub struct ConsistencyScorer {
    similarity_threshold: f64,
}

impl Default for ConsistencyScorer {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl ConsistencyScorer {
    pub fn new(similarity_threshold: f64) -> Self {
        Self {
            similarity_threshold,
        }
    }

    /// Score `original` against the successfully obtained `samples`.
    ///
    /// `requested` and `failed` are recorded as evidence only. Returns `None`
    /// when no sample succeeded; the caller must then exclude the detector.
    pub fn score(
        &self,
        original: &str,
        samples: &[String],
        requested: usize,
        failed: usize,
    ) -> Option<DetectionVerdict> {
        if samples.is_empty() {
            return None;
        }
        let mut texts: Vec<&str> = Vec::with_capacity(samples.len() + 1);
        texts.push(original);
        texts.extend(samples.iter().map(String::as_str));

        let agreement = agreement_score(&texts, self.similarity_threshold)?;
        let evidence = json!({
            "agreement": agreement,
            "samples_requested": requested,
            "samples_obtained": samples.len(),
            "samples_failed": failed,
            "similarity_threshold": self.similarity_threshold,
        });

        let verdict = if agreement >= HIGH_AGREEMENT {
            DetectionVerdict::correct(DetectorKind::SelfConsistency, agreement)
        } else if agreement < LOW_AGREEMENT {
            DetectionVerdict::hallucination(
                DetectorKind::SelfConsistency,
                1.0 - agreement,
                HallucinationKind::Inconsistency,
            )
        } else {
            DetectionVerdict::uncertain(
                DetectorKind::SelfConsistency,
                UNCERTAIN_AGREEMENT_CONFIDENCE,
            )
        };
        Some(verdict.with_evidence(evidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::verdict::Label;

    fn samples(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pair_similarity_contained_answer() {
        assert_eq!(pair_similarity("Paris.", "The capital is Paris"), 1.0);
        assert_eq!(pair_similarity("The capital is Paris", "paris"), 1.0);
    }

    #[test]
    fn test_pair_similarity_empty_side() {
        assert_eq!(pair_similarity("", "paris"), 0.0);
        assert_eq!(pair_similarity("", ""), 0.0);
    }

    #[test]
    fn test_agreement_needs_a_pair() {
        assert_eq!(agreement_score(&["only one"], 0.6), None);
    }

    #[test]
    fn test_similarity_at_threshold_does_not_agree() {
        // 3 of 5 tokens shared = 0.6, not strictly above 0.6
        let (a, b) = ("alpha bravo charlie delta echo", "alpha bravo charlie xray yankee");
        assert!((pair_similarity(a, b) - 0.6).abs() < 1e-9);
        assert_eq!(agreement_score(&[a, b], 0.6), Some(0.0));
        assert_eq!(agreement_score(&[a, b], 0.59), Some(1.0));
    }

    #[test]
    fn test_agreement_counts_pairs() {
        // 3 identical + 1 outlier: 3 of 6 pairs agree
        let score = agreement_score(&["x y", "x y", "x y", "z"], 0.6).unwrap();
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_consistent_samples_lean_correct() {
        let scorer = ConsistencyScorer::default();
        let verdict = scorer
            .score("Paris.", &samples(&["paris", "The capital is Paris.", "Paris"]), 3, 0)
            .unwrap();
        assert_eq!(verdict.label, Label::Correct);
        assert_eq!(verdict.confidence, 1.0);
    }

    #[test]
    fn test_divergent_samples_lean_hallucination() {
        let scorer = ConsistencyScorer::default();
        let verdict = scorer.score("2", &samples(&["4", "5", "6"]), 3, 0).unwrap();
        assert_eq!(verdict.label, Label::Hallucination);
        assert_eq!(verdict.confidence, 1.0);
        assert_eq!(verdict.kind, Some(HallucinationKind::Inconsistency));
    }

    #[test]
    fn test_middle_band_is_uncertain() {
        let scorer = ConsistencyScorer::default();
        let verdict = scorer
            .score("blue", &samples(&["blue", "blue", "green"]), 3, 0)
            .unwrap();
        assert_eq!(verdict.label, Label::Uncertain);
        assert_eq!(verdict.confidence, UNCERTAIN_AGREEMENT_CONFIDENCE);
    }

    #[test]
    fn test_partial_sampling_still_scores() {
        let scorer = ConsistencyScorer::default();
        let verdict = scorer.score("paris", &samples(&["paris"]), 3, 2).unwrap();
        assert_eq!(verdict.label, Label::Correct);
        assert_eq!(verdict.evidence["samples_failed"], 2);
        assert_eq!(verdict.evidence["samples_obtained"], 1);
    }

    #[test]
    fn test_no_samples_yields_none() {
        let scorer = ConsistencyScorer::default();
        assert!(scorer.score("paris", &[], 3, 3).is_none());
    }
}
