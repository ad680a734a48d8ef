//! OpenAI-compatible chat completions provider
//!
//! Works against any service exposing `POST /v1/chat/completions`
//! (OpenAI, Groq, vLLM, Ollama, LM Studio).

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::HeaderMap};
use serde_json::{Value, json};
use std::time::{Duration, Instant};
use tracing::debug;
use veracity_application::{Generation, GenerationRequest, LlmProvider, ProviderError};
use veracity_domain::core::response::estimate_tokens;

/// Longest error body kept in a `Permanent` message
const MAX_ERROR_BODY: usize = 200;

/// Upper bound on a server-supplied `Retry-After` delay
const MAX_RETRY_AFTER: Duration = Duration::from_secs(120);

pub struct OpenAiCompatibleProvider {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    name: String,
}

impl OpenAiCompatibleProvider {
    /// `base_url` is the service root, without the `/v1/...` path.
    pub fn new(
        client: Client,
        provider: &str,
        base_url: &str,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        let model = model.into();
        Self {
            client,
            endpoint: format!("{}/v1/chat/completions", base_url.trim_end_matches('/')),
            api_key,
            name: format!("{}:{}", provider, model),
            model,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body(&self, request: &GenerationRequest) -> Value {
        json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": request.prompt }],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "stream": false,
        })
    }

    /// Extract the first choice's text and the reported token usage.
    fn parse_response(body: &Value) -> Result<(String, Option<u64>), ProviderError> {
        let message = body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|choice| choice.get("message"))
            .ok_or_else(|| ProviderError::Permanent("No choices in response".to_string()))?;

        let text = message
            .get("content")
            .and_then(|c| c.as_str())
            .unwrap_or("")
            .to_string();

        let total_tokens = body
            .get("usage")
            .and_then(|u| u.get("total_tokens"))
            .and_then(|t| t.as_u64());

        Ok((text, total_tokens))
    }

    /// Map a non-success HTTP status to a provider error.
    fn map_http_error(status: StatusCode, headers: &HeaderMap, body: &str) -> ProviderError {
        match status.as_u16() {
            429 => ProviderError::RateLimited {
                retry_after: Self::retry_after(headers),
            },
            408 | 504 => ProviderError::Timeout,
            _ => {
                let mut snippet: String = body.chars().take(MAX_ERROR_BODY).collect();
                if snippet.len() < body.len() {
                    snippet.push_str("...");
                }
                ProviderError::Permanent(format!("HTTP {}: {}", status, snippet))
            }
        }
    }

    /// `Retry-After` in seconds, capped at [`MAX_RETRY_AFTER`]; HTTP-date
    /// values are ignored.
    fn retry_after(headers: &HeaderMap) -> Option<Duration> {
        let secs = headers
            .get(reqwest::header::RETRY_AFTER)?
            .to_str()
            .ok()?
            .trim()
            .parse::<f64>()
            .ok()?;
        if !secs.is_finite() || secs < 0.0 {
            return None;
        }
        let delay = Duration::try_from_secs_f64(secs).unwrap_or(MAX_RETRY_AFTER);
        Some(delay.min(MAX_RETRY_AFTER))
    }

    fn map_transport_error(err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Permanent(format!("Request failed: {}", err))
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, ProviderError> {
        debug!(url = %self.endpoint, model = %self.model, "Sending chat completion request");

        let mut builder = self.client.post(&self.endpoint).json(&self.request_body(request));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let started = Instant::now();
        let response = builder.send().await.map_err(Self::map_transport_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(Self::map_transport_error)?;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        if !status.is_success() {
            return Err(Self::map_http_error(status, &headers, &body));
        }

        let json: Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Permanent(format!("Invalid JSON: {}", e)))?;
        let (text, total_tokens) = Self::parse_response(&json)?;
        let token_count = total_tokens.unwrap_or_else(|| estimate_tokens(&text));

        Ok(Generation {
            text,
            latency_ms,
            token_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, RETRY_AFTER};

    fn provider() -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::new(
            Client::new(),
            "groq",
            "https://api.groq.com/openai/",
            "llama-3.1-8b-instant",
            Some("key".to_string()),
        )
    }

    #[test]
    fn test_endpoint_and_name() {
        let p = provider();
        assert_eq!(p.endpoint(), "https://api.groq.com/openai/v1/chat/completions");
        assert_eq!(p.name(), "groq:llama-3.1-8b-instant");
    }

    #[test]
    fn test_request_body() {
        let body = provider().request_body(&GenerationRequest::new("What is 2+2?", 0.3, 150));
        assert_eq!(body["model"], "llama-3.1-8b-instant");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "What is 2+2?");
        assert_eq!(body["temperature"], 0.3);
        assert_eq!(body["max_tokens"], 150);
    }

    #[test]
    fn test_parse_text_response() {
        let body = json!({
            "choices": [{ "message": { "role": "assistant", "content": "Paris" } }],
            "usage": { "prompt_tokens": 12, "completion_tokens": 2, "total_tokens": 14 }
        });
        let (text, tokens) = OpenAiCompatibleProvider::parse_response(&body).unwrap();
        assert_eq!(text, "Paris");
        assert_eq!(tokens, Some(14));
    }

    #[test]
    fn test_parse_response_without_usage() {
        let body = json!({ "choices": [{ "message": { "content": "four" } }] });
        let (_, tokens) = OpenAiCompatibleProvider::parse_response(&body).unwrap();
        assert_eq!(tokens, None);
    }

    #[test]
    fn test_parse_response_no_choices() {
        let err = OpenAiCompatibleProvider::parse_response(&json!({ "choices": [] })).unwrap_err();
        assert!(!err.is_transient());
    }

    #[test]
    fn test_http_error_mapping_429_with_retry_after() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        let err =
            OpenAiCompatibleProvider::map_http_error(StatusCode::TOO_MANY_REQUESTS, &headers, "");
        assert_eq!(
            err,
            ProviderError::RateLimited {
                retry_after: Some(Duration::from_secs(7))
            }
        );
    }

    #[test]
    fn test_retry_after_is_capped() {
        for value in ["1e20", "86400"] {
            let mut headers = HeaderMap::new();
            headers.insert(RETRY_AFTER, HeaderValue::from_static(value));
            let err = OpenAiCompatibleProvider::map_http_error(
                StatusCode::TOO_MANY_REQUESTS,
                &headers,
                "",
            );
            assert_eq!(
                err,
                ProviderError::RateLimited {
                    retry_after: Some(MAX_RETRY_AFTER)
                },
                "Retry-After {:?}",
                value
            );
        }
    }

    #[test]
    fn test_retry_after_rejects_negative() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("-5"));
        let err =
            OpenAiCompatibleProvider::map_http_error(StatusCode::TOO_MANY_REQUESTS, &headers, "");
        assert_eq!(err, ProviderError::RateLimited { retry_after: None });
    }

    #[test]
    fn test_http_error_mapping_429_with_date_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2026 07:28:00 GMT"),
        );
        let err =
            OpenAiCompatibleProvider::map_http_error(StatusCode::TOO_MANY_REQUESTS, &headers, "");
        assert_eq!(err, ProviderError::RateLimited { retry_after: None });
    }

    #[test]
    fn test_http_error_mapping_timeouts() {
        let headers = HeaderMap::new();
        for status in [StatusCode::REQUEST_TIMEOUT, StatusCode::GATEWAY_TIMEOUT] {
            assert_eq!(
                OpenAiCompatibleProvider::map_http_error(status, &headers, ""),
                ProviderError::Timeout
            );
        }
    }

    #[test]
    fn test_http_error_mapping_permanent() {
        let body = "x".repeat(500);
        let err = OpenAiCompatibleProvider::map_http_error(
            StatusCode::UNAUTHORIZED,
            &HeaderMap::new(),
            &body,
        );
        match err {
            ProviderError::Permanent(msg) => {
                assert!(msg.starts_with("HTTP 401"));
                assert!(msg.ends_with("..."));
                assert!(msg.len() < 300);
            }
            other => panic!("expected Permanent, got {:?}", other),
        }
    }
}
