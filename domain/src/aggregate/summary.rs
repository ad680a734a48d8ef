//! Finalized run summary

use super::bucket::BucketStats;
use super::trend::DifficultyTrend;
use crate::core::question::{Category, Difficulty};
use crate::detection::HallucinationKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCount {
    pub kind: HallucinationKind,
    pub count: u64,
}

/// Statistics for a whole run, as reported and persisted
///
/// Buckets are lists keyed by name so the JSON shape stays a plain array.
/// `by_difficulty` always lists every tier; `by_category` only the
/// categories that received verdicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Questions seen, scored or not
    pub total_questions: u64,
    /// Questions that received a verdict
    pub evaluated: u64,
    /// Questions whose primary response could not be obtained
    pub failures: u64,
    /// Evaluated questions scored with a detector excluded
    pub degraded: u64,
    /// Provider calls that ended without a usable response, samples included
    #[serde(default)]
    pub provider_errors: u64,
    pub overall: BucketStats,
    pub by_category: Vec<BucketStats>,
    pub by_difficulty: Vec<BucketStats>,
    pub by_trigger: Vec<BucketStats>,
    pub difficulty_trend: DifficultyTrend,
    #[serde(default)]
    pub hallucination_kinds: Vec<KindCount>,
}

impl RunSummary {
    pub fn category(&self, category: Category) -> Option<&BucketStats> {
        self.by_category.iter().find(|b| b.key == category.as_str())
    }

    pub fn difficulty(&self, difficulty: Difficulty) -> Option<&BucketStats> {
        self.by_difficulty.iter().find(|b| b.key == difficulty.as_str())
    }

    pub fn trigger(&self, key: &str) -> Option<&BucketStats> {
        self.by_trigger.iter().find(|b| b.key == key)
    }

    pub fn kind_count(&self, kind: HallucinationKind) -> u64 {
        self.hallucination_kinds
            .iter()
            .find(|k| k.kind == kind)
            .map_or(0, |k| k.count)
    }
}
