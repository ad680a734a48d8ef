//! Provider construction from configuration
//!
//! Turns a `provider:model` target into a ready [`LlmProvider`], resolving
//! endpoint presets and API keys.

use super::openai_compatible::OpenAiCompatibleProvider;
use crate::config::{FileProvidersConfig, ResolvedEndpoint};
use reqwest::Client;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use veracity_application::LlmProvider;

#[derive(Error, Debug)]
pub enum ProviderSetupError {
    #[error("Unknown provider '{0}'; declare it under [providers.endpoints.{0}]")]
    UnknownProvider(String),

    #[error("Missing API key for provider '{provider}': set {env}")]
    MissingApiKey { provider: String, env: String },

    #[error("Invalid model target '{0}'; expected [provider:]model")]
    InvalidTarget(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// A model to evaluate and the provider serving it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTarget {
    pub provider: String,
    pub model: String,
}

impl ModelTarget {
    /// Parse `provider:model`, or a bare `model` served by `default_provider`.
    ///
    /// Only the first colon separates the provider, so model names such as
    /// `llama3:8b` work when prefixed (`local:llama3:8b`).
    pub fn parse(target: &str, default_provider: &str) -> Result<Self, ProviderSetupError> {
        let target = target.trim();
        let (provider, model) = match target.split_once(':') {
            Some((provider, model)) => (provider.trim(), model.trim()),
            None => (default_provider, target),
        };
        if provider.is_empty() || model.is_empty() {
            return Err(ProviderSetupError::InvalidTarget(target.to_string()));
        }
        Ok(Self {
            provider: provider.to_string(),
            model: model.to_string(),
        })
    }
}

impl fmt::Display for ModelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.model)
    }
}

/// Builds providers for model targets from the `[providers]` configuration
pub struct ProviderRegistry {
    config: FileProvidersConfig,
    client: Client,
}

impl ProviderRegistry {
    /// `request_timeout` bounds each HTTP request at the transport level; the
    /// application applies its own per-call deadline on top.
    pub fn new(
        config: FileProvidersConfig,
        request_timeout: Duration,
    ) -> Result<Self, ProviderSetupError> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn default_provider(&self) -> &str {
        &self.config.default
    }

    pub fn default_model(&self) -> Option<&str> {
        self.config.default_model.as_deref()
    }

    pub fn parse_target(&self, target: &str) -> Result<ModelTarget, ProviderSetupError> {
        ModelTarget::parse(target, &self.config.default)
    }

    pub fn build(&self, target: &ModelTarget) -> Result<Arc<dyn LlmProvider>, ProviderSetupError> {
        self.build_with_env(target, |name| std::env::var(name).ok())
    }

    /// Build with a custom environment lookup.
    pub fn build_with_env(
        &self,
        target: &ModelTarget,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Arc<dyn LlmProvider>, ProviderSetupError> {
        let endpoint = self
            .config
            .resolve(&target.provider)
            .ok_or_else(|| ProviderSetupError::UnknownProvider(target.provider.clone()))?;
        let api_key = Self::api_key(&endpoint, env)?;

        info!(
            provider = %endpoint.name,
            model = %target.model,
            base_url = %endpoint.base_url,
            "Provider initialized"
        );
        Ok(Arc::new(OpenAiCompatibleProvider::new(
            self.client.clone(),
            &endpoint.name,
            &endpoint.base_url,
            &target.model,
            api_key,
        )))
    }

    /// Inline key, then the configured variable. Endpoints without a key
    /// variable (local servers) run unauthenticated.
    fn api_key(
        endpoint: &ResolvedEndpoint,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<String>, ProviderSetupError> {
        if let Some(key) = &endpoint.api_key {
            return Ok(Some(key.clone()));
        }
        match &endpoint.api_key_env {
            Some(var) => env(var)
                .filter(|key| !key.trim().is_empty())
                .map(Some)
                .ok_or_else(|| ProviderSetupError::MissingApiKey {
                    provider: endpoint.name.clone(),
                    env: var.clone(),
                }),
            None => {
                debug!(
                    provider = %endpoint.name,
                    "No API key configured; sending unauthenticated requests"
                );
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(config: FileProvidersConfig) -> ProviderRegistry {
        ProviderRegistry::new(config, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(
            ModelTarget::parse("groq:llama-3.1-8b-instant", "openai").unwrap(),
            ModelTarget {
                provider: "groq".to_string(),
                model: "llama-3.1-8b-instant".to_string()
            }
        );
        let bare = ModelTarget::parse("gpt-4o-mini", "openai").unwrap();
        assert_eq!(bare.provider, "openai");
        assert_eq!(bare.to_string(), "openai:gpt-4o-mini");

        let nested = ModelTarget::parse("local:llama3:8b", "openai").unwrap();
        assert_eq!(nested.provider, "local");
        assert_eq!(nested.model, "llama3:8b");

        assert!(ModelTarget::parse("groq:", "openai").is_err());
        assert!(ModelTarget::parse("", "openai").is_err());
    }

    #[test]
    fn test_build_with_env_key() {
        let registry = registry(FileProvidersConfig::default());
        let target = registry.parse_target("groq:llama-3.1-8b-instant").unwrap();
        let provider = registry
            .build_with_env(&target, |var| {
                (var == "GROQ_API_KEY").then(|| "secret".to_string())
            })
            .unwrap();
        assert_eq!(provider.name(), "groq:llama-3.1-8b-instant");
    }

    #[test]
    fn test_missing_api_key() {
        let registry = registry(FileProvidersConfig::default());
        let target = registry.parse_target("openai:gpt-4o-mini").unwrap();
        let err = registry.build_with_env(&target, |_| None).err().unwrap();
        assert!(matches!(
            err,
            ProviderSetupError::MissingApiKey { ref env, .. } if env == "OPENAI_API_KEY"
        ));
    }

    #[test]
    fn test_unknown_provider() {
        let registry = registry(FileProvidersConfig::default());
        let target = registry.parse_target("mystery:model").unwrap();
        let err = registry.build_with_env(&target, |_| None).err().unwrap();
        assert!(matches!(err, ProviderSetupError::UnknownProvider(ref p) if p == "mystery"));
    }

    #[test]
    fn test_local_endpoint_needs_no_key() {
        let config: FileProvidersConfig = toml::from_str(
            r#"
[endpoints.local]
base_url = "http://127.0.0.1:11434"
"#,
        )
        .unwrap();
        let registry = registry(config);
        let target = registry.parse_target("local:llama3:8b").unwrap();
        let provider = registry.build_with_env(&target, |_| None).unwrap();
        assert_eq!(provider.name(), "local:llama3:8b");
    }
}
