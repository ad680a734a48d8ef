//! Configuration file loading for veracity
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./veracity.toml` or `./.veracity.toml`
//! 3. Global: `$XDG_CONFIG_HOME/veracity/config.toml`
//! 4. Default values
//!
//! Command-line flags are applied on top by the binary.

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileEndpointConfig, FileOutputConfig, FileProvidersConfig, FileRunConfig,
    PRESETS, ResolvedEndpoint,
};
pub use loader::ConfigLoader;
