//! Provider configuration from TOML (`[providers]` section)
//!
//! Two presets are built in, `openai` and `groq`. Any other OpenAI-compatible
//! service can be declared under `[providers.endpoints.<name>]`. Every field
//! of an endpoint is optional; unset fields fall back to the preset of the
//! same name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Built-in provider presets: (name, base URL, API key variable)
pub const PRESETS: [(&str, &str, &str); 2] = [
    ("openai", "https://api.openai.com", "OPENAI_API_KEY"),
    ("groq", "https://api.groq.com/openai", "GROQ_API_KEY"),
];

/// One OpenAI-compatible endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEndpointConfig {
    /// Base URL without the `/v1/...` path.
    pub base_url: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: Option<String>,
    /// Direct API key; prefer `api_key_env`.
    pub api_key: Option<String>,
}

/// Endpoint settings after presets are applied
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEndpoint {
    pub name: String,
    pub base_url: String,
    pub api_key_env: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Provider used for `--model <model>` targets without a `provider:` prefix.
    pub default: String,
    /// Model evaluated when no `--model` is given.
    pub default_model: Option<String>,
    /// Overrides for the OpenAI preset.
    pub openai: FileEndpointConfig,
    /// Overrides for the Groq preset.
    pub groq: FileEndpointConfig,
    /// Further OpenAI-compatible endpoints by name.
    pub endpoints: BTreeMap<String, FileEndpointConfig>,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        Self {
            default: "openai".to_string(),
            default_model: None,
            openai: FileEndpointConfig::default(),
            groq: FileEndpointConfig::default(),
            endpoints: BTreeMap::new(),
        }
    }
}

impl FileProvidersConfig {
    /// Whether `name` is a preset or a declared endpoint
    pub fn is_known(&self, name: &str) -> bool {
        PRESETS.iter().any(|(preset, _, _)| *preset == name) || self.endpoints.contains_key(name)
    }

    /// Merge the configured endpoint `name` with its preset.
    ///
    /// `None` when the name is unknown or no base URL can be determined.
    pub fn resolve(&self, name: &str) -> Option<ResolvedEndpoint> {
        let configured = match name {
            "openai" => Some(&self.openai),
            "groq" => Some(&self.groq),
            other => self.endpoints.get(other),
        };
        let preset = PRESETS.iter().find(|(preset, _, _)| *preset == name);
        if configured.is_none() && preset.is_none() {
            return None;
        }
        let empty = FileEndpointConfig::default();
        let configured = configured.unwrap_or(&empty);

        let base_url = configured
            .base_url
            .clone()
            .or_else(|| preset.map(|(_, url, _)| url.to_string()))?;
        let api_key_env = configured
            .api_key_env
            .clone()
            .or_else(|| preset.map(|(_, _, env)| env.to_string()));

        Some(ResolvedEndpoint {
            name: name.to_string(),
            base_url,
            api_key_env,
            api_key: configured.api_key.clone(),
        })
    }
}
