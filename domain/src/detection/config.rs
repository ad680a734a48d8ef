//! Detector thresholds
//!
//! These values set each detector's bias/recall trade-off. They are named
//! here, carried in [`DetectionConfig`], and never written inline.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Minimum expected-token overlap for partial credit (UNCERTAIN instead of HALLUCINATION)
pub const DEFAULT_OVERLAP_THRESHOLD: f64 = 0.7;

/// Pairwise similarity a sample pair must exceed to count as agreeing
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;

/// Additional samples requested per question for self-consistency
pub const DEFAULT_CONSISTENCY_SAMPLES: usize = 3;

/// Sampling temperature for self-consistency samples
pub const DEFAULT_SAMPLING_TEMPERATURE: f64 = 0.7;

/// Agreement at or above which self-consistency leans CORRECT
pub const HIGH_AGREEMENT: f64 = 0.66;

/// Agreement below which self-consistency leans HALLUCINATION
pub const LOW_AGREEMENT: f64 = 0.33;

/// Confidence of a self-consistency verdict in the uncertain band
pub const UNCERTAIN_AGREEMENT_CONFIDENCE: f64 = 0.5;

/// Confidence attached to any detected contradiction
pub const CONTRADICTION_CONFIDENCE: f64 = 0.8;

/// Confidence of the absence-of-contradiction signal
pub const NO_CONTRADICTION_CONFIDENCE: f64 = 0.5;

/// Overlap ratio below which a mismatch is classed as fabrication
pub const FABRICATION_OVERLAP: f64 = 0.3;

/// Tunable detector thresholds
///
/// # Example
///
/// ```
/// use veracity_domain::detection::DetectionConfig;
///
/// let config = DetectionConfig::default()
///     .with_overlap_threshold(0.8)
///     .with_samples(5);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.consistency_samples, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub overlap_threshold: f64,
    pub similarity_threshold: f64,
    /// Zero disables the self-consistency detector
    pub consistency_samples: usize,
    pub sampling_temperature: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            consistency_samples: DEFAULT_CONSISTENCY_SAMPLES,
            sampling_temperature: DEFAULT_SAMPLING_TEMPERATURE,
        }
    }
}

impl DetectionConfig {
    pub fn with_overlap_threshold(mut self, threshold: f64) -> Self {
        self.overlap_threshold = threshold;
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.consistency_samples = samples;
        self
    }

    pub fn with_sampling_temperature(mut self, temperature: f64) -> Self {
        self.sampling_temperature = temperature;
        self
    }

    /// Whether the self-consistency detector runs at all
    pub fn consistency_enabled(&self) -> bool {
        self.consistency_samples > 0
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        for (name, value) in [
            ("overlap_threshold", self.overlap_threshold),
            ("similarity_threshold", self.similarity_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(DomainError::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DetectionConfig::default();
        assert_eq!(config.overlap_threshold, 0.7);
        assert_eq!(config.similarity_threshold, 0.6);
        assert_eq!(config.consistency_samples, 3);
        assert!(config.consistency_enabled());
    }

    #[test]
    fn test_zero_samples_disables_consistency() {
        assert!(!DetectionConfig::default().with_samples(0).consistency_enabled());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let err = DetectionConfig::default()
            .with_similarity_threshold(1.2)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidThreshold {
                name: "similarity_threshold",
                value: 1.2
            }
        );
    }
}
