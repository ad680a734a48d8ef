//! Per-label weight tally for the ensemble vote

use crate::detection::{DetectionVerdict, Label};
use serde::{Deserialize, Serialize};

/// Weights closer than this are treated as a tie
pub const TIE_EPSILON: f64 = 1e-9;

/// Summed confidence per label
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelWeights {
    pub correct: f64,
    pub hallucination: f64,
    pub uncertain: f64,
}

impl LabelWeights {
    pub fn get(&self, label: Label) -> f64 {
        match label {
            Label::Correct => self.correct,
            Label::Hallucination => self.hallucination,
            Label::Uncertain => self.uncertain,
        }
    }

    fn add(&mut self, label: Label, weight: f64) {
        match label {
            Label::Correct => self.correct += weight,
            Label::Hallucination => self.hallucination += weight,
            Label::Uncertain => self.uncertain += weight,
        }
    }

    pub fn total(&self) -> f64 {
        self.correct + self.hallucination + self.uncertain
    }
}

/// Running tally of a weighted vote
///
/// Each verdict adds its confidence to its own label. The tally also keeps,
/// per label, the best (lowest) detector priority that voted for it, which
/// settles ties.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    weights: LabelWeights,
    best_priority: [Option<u8>; 3],
}

impl Tally {
    pub fn from_verdicts<'a>(verdicts: impl IntoIterator<Item = &'a DetectionVerdict>) -> Self {
        let mut tally = Self::default();
        for verdict in verdicts {
            tally.add(verdict);
        }
        tally
    }

    pub fn add(&mut self, verdict: &DetectionVerdict) {
        self.weights.add(verdict.label, verdict.confidence);
        let slot = &mut self.best_priority[label_index(verdict.label)];
        let priority = verdict.detector.priority();
        *slot = Some(slot.map_or(priority, |p| p.min(priority)));
    }

    pub fn weights(&self) -> LabelWeights {
        self.weights
    }

    /// Winning label and its normalized share of the total weight.
    ///
    /// `None` when no weight was cast at all.
    pub fn winner(&self) -> Option<(Label, f64)> {
        let total = self.weights.total();
        if total <= 0.0 {
            return None;
        }

        let mut best: Option<Label> = None;
        for label in Label::ALL {
            if self.best_priority[label_index(label)].is_none() {
                continue;
            }
            best = match best {
                None => Some(label),
                Some(current) => {
                    let diff = self.weights.get(label) - self.weights.get(current);
                    if diff > TIE_EPSILON {
                        Some(label)
                    } else if diff.abs() <= TIE_EPSILON && self.outranks(label, current) {
                        Some(label)
                    } else {
                        Some(current)
                    }
                }
            };
        }

        best.map(|label| (label, self.weights.get(label) / total))
    }

    fn outranks(&self, a: Label, b: Label) -> bool {
        match (
            self.best_priority[label_index(a)],
            self.best_priority[label_index(b)],
        ) {
            (Some(pa), Some(pb)) => pa < pb,
            (Some(_), None) => true,
            _ => false,
        }
    }
}

fn label_index(label: Label) -> usize {
    match label {
        Label::Correct => 0,
        Label::Hallucination => 1,
        Label::Uncertain => 2,
    }
}
