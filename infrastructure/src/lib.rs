//! Infrastructure layer for veracity
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration, corpus and result
//! file handling.

pub mod config;
pub mod corpus;
pub mod logging;
pub mod providers;
pub mod results;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig, FileOutputConfig, FileProvidersConfig, FileRunConfig};
pub use corpus::{CorpusError, CorpusLoader};
pub use logging::JsonlEvaluationLogger;
pub use providers::{ModelTarget, OpenAiCompatibleProvider, ProviderRegistry, ProviderSetupError};
pub use results::{ResultFile, ResultFileError, ResultStore, RunMetadata};
