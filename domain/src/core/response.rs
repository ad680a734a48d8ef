//! Model response value object

use serde::{Deserialize, Serialize};

/// Raw provider output for one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Generated text, unmodified
    pub text: String,
    /// Wall-clock latency of the provider call in milliseconds
    pub latency_ms: f64,
    /// Approximate number of tokens consumed
    pub token_count: u64,
}

impl ModelResponse {
    pub fn new(text: impl Into<String>, latency_ms: f64, token_count: u64) -> Self {
        Self {
            text: text.into(),
            latency_ms: latency_ms.max(0.0),
            token_count,
        }
    }
}

/// Rough token estimate for providers that do not report usage
pub fn estimate_tokens(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}
