//! Difficulty-correlation check
//!
//! The expected pattern is a hallucination rate that never decreases from
//! easy to medium to hard. Tiers without verdicts are left out of the
//! comparison. Violations are reported, never corrected.

use crate::core::question::Difficulty;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStatus {
    Satisfied,
    Violated,
    /// Fewer than two tiers have verdicts
    InsufficientData,
}

impl TrendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendStatus::Satisfied => "satisfied",
            TrendStatus::Violated => "violated",
            TrendStatus::InsufficientData => "insufficient_data",
        }
    }
}

/// Hallucination rate of one non-empty tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierRate {
    pub difficulty: Difficulty,
    pub total: u64,
    pub hallucination_rate: f64,
}

/// A consecutive tier pair where the rate dropped
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendViolation {
    pub from: Difficulty,
    pub to: Difficulty,
    pub from_rate: f64,
    pub to_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTrend {
    pub status: TrendStatus,
    pub tiers: Vec<TierRate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<TrendViolation>,
}

impl DifficultyTrend {
    /// Check `tiers` in the order given, skipping empty ones.
    pub fn check(tiers: impl IntoIterator<Item = TierRate>) -> Self {
        let tiers: Vec<TierRate> = tiers.into_iter().filter(|t| t.total > 0).collect();
        if tiers.len() < 2 {
            return Self {
                status: TrendStatus::InsufficientData,
                tiers,
                violations: Vec::new(),
            };
        }

        let violations: Vec<TrendViolation> = tiers
            .windows(2)
            .filter(|pair| pair[1].hallucination_rate < pair[0].hallucination_rate)
            .map(|pair| TrendViolation {
                from: pair[0].difficulty,
                to: pair[1].difficulty,
                from_rate: pair[0].hallucination_rate,
                to_rate: pair[1].hallucination_rate,
            })
            .collect();

        let status = if violations.is_empty() {
            TrendStatus::Satisfied
        } else {
            TrendStatus::Violated
        };
        Self {
            status,
            tiers,
            violations,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.status == TrendStatus::Satisfied
    }
}
