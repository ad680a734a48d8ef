//! Running counters for one stratum of verdicts

use crate::detection::Label;
use serde::{Deserialize, Serialize};

/// Whether a question was built to provoke errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerGroup {
    Trigger,
    Standard,
}

impl TriggerGroup {
    pub fn of(is_trigger: bool) -> Self {
        if is_trigger {
            TriggerGroup::Trigger
        } else {
            TriggerGroup::Standard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerGroup::Trigger => "trigger",
            TriggerGroup::Standard => "standard",
        }
    }
}

/// Incremental counters, converted to rates only by [`BucketCounts::finalize`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketCounts {
    pub total: u64,
    pub correct: u64,
    pub hallucinated: u64,
    pub uncertain: u64,
    pub latency_ms_sum: f64,
    pub token_sum: u64,
}

impl BucketCounts {
    pub fn add(&mut self, label: Label, latency_ms: f64, tokens: u64) {
        self.total += 1;
        match label {
            Label::Correct => self.correct += 1,
            Label::Hallucination => self.hallucinated += 1,
            Label::Uncertain => self.uncertain += 1,
        }
        self.latency_ms_sum += latency_ms;
        self.token_sum += tokens;
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn hallucination_rate(&self) -> f64 {
        ratio(self.hallucinated, self.total)
    }

    /// Snapshot with percentages; an empty bucket reports zero rates.
    pub fn finalize(&self, key: impl Into<String>) -> BucketStats {
        BucketStats {
            key: key.into(),
            total: self.total,
            correct: self.correct,
            hallucinated: self.hallucinated,
            uncertain: self.uncertain,
            accuracy: ratio(self.correct, self.total),
            hallucination_rate: self.hallucination_rate(),
            uncertain_rate: ratio(self.uncertain, self.total),
            mean_latency_ms: if self.total == 0 {
                0.0
            } else {
                self.latency_ms_sum / self.total as f64
            },
            mean_tokens: ratio(self.token_sum, self.total),
        }
    }
}

fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Finalized statistics of one bucket
///
/// Rates are fractions in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketStats {
    pub key: String,
    pub total: u64,
    pub correct: u64,
    pub hallucinated: u64,
    pub uncertain: u64,
    pub accuracy: f64,
    pub hallucination_rate: f64,
    pub uncertain_rate: f64,
    pub mean_latency_ms: f64,
    pub mean_tokens: f64,
}
