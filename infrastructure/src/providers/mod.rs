//! LLM provider adapters

pub mod openai_compatible;
pub mod registry;

pub use openai_compatible::OpenAiCompatibleProvider;
pub use registry::{ModelTarget, ProviderRegistry, ProviderSetupError};
