//! LLM provider port
//!
//! Defines the interface for obtaining completions from a text-generation
//! service. Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use veracity_domain::ModelResponse;

/// Errors a provider call can end with
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Quota exceeded; back off and retry
    #[error("Rate limited{}", retry_suffix(.retry_after))]
    RateLimited { retry_after: Option<Duration> },

    /// The call took too long and was abandoned
    #[error("Timeout")]
    Timeout,

    /// Anything retrying will not fix (auth, bad request, unparseable reply)
    #[error("Provider error: {0}")]
    Permanent(String),
}

fn retry_suffix(retry_after: &Option<Duration>) -> String {
    retry_after
        .map(|d| format!(" (retry after {}s)", d.as_secs()))
        .unwrap_or_default()
}

impl ProviderError {
    /// Whether a retry may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::RateLimited { .. } | ProviderError::Timeout)
    }
}

/// One completion request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, temperature: f64, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            temperature,
            max_tokens,
        }
    }
}

/// A completed generation
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub text: String,
    pub latency_ms: f64,
    pub token_count: u64,
}

impl From<Generation> for ModelResponse {
    fn from(generation: Generation) -> Self {
        ModelResponse::new(generation.text, generation.latency_ms, generation.token_count)
    }
}

/// Text-generation capability
///
/// Every concrete provider (OpenAI, Groq, any compatible endpoint, test
/// doubles) implements this one trait.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Display name, e.g. `openai:gpt-4o-mini`
    fn name(&self) -> &str;

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ProviderError::Timeout.is_transient());
        assert!(ProviderError::RateLimited { retry_after: None }.is_transient());
        assert!(!ProviderError::Permanent("401".to_string()).is_transient());
    }

    #[test]
    fn test_rate_limited_display() {
        let err = ProviderError::RateLimited {
            retry_after: Some(Duration::from_secs(7)),
        };
        assert_eq!(err.to_string(), "Rate limited (retry after 7s)");
        let err = ProviderError::RateLimited { retry_after: None };
        assert_eq!(err.to_string(), "Rate limited");
    }

    #[test]
    fn test_generation_into_response() {
        let response: ModelResponse = Generation {
            text: "Paris".to_string(),
            latency_ms: 120.0,
            token_count: 9,
        }
        .into();
        assert_eq!(response.text, "Paris");
        assert_eq!(response.token_count, 9);
    }
}
