//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown difficulty: {0} (expected easy, medium or hard)")]
    UnknownDifficulty(String),

    #[error("Threshold {name} must be within [0, 1], got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
}

impl DomainError {
    /// Check if this error was caused by a malformed corpus field
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidQuestion(_)
                | DomainError::UnknownCategory(_)
                | DomainError::UnknownDifficulty(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_error_display() {
        let error = DomainError::InvalidThreshold {
            name: "overlap_threshold",
            value: 1.5,
        };
        assert_eq!(
            error.to_string(),
            "Threshold overlap_threshold must be within [0, 1], got 1.5"
        );
    }

    #[test]
    fn test_is_malformed_input() {
        assert!(DomainError::UnknownCategory("poetry".to_string()).is_malformed_input());
        assert!(DomainError::UnknownDifficulty("extreme".to_string()).is_malformed_input());
        assert!(
            !DomainError::InvalidThreshold {
                name: "x",
                value: 2.0
            }
            .is_malformed_input()
        );
    }
}
