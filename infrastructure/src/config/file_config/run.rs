//! Run configuration from TOML (`[run]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRunConfig {
    /// Corpus used when `--corpus` is not given.
    pub corpus: Option<PathBuf>,
    /// Questions evaluated at the same time.
    pub concurrency: usize,
    /// Temperature of the primary response.
    pub temperature: f64,
    /// Token cap of the primary response.
    pub max_tokens: u32,
    /// Token cap of each self-consistency sample.
    pub sample_max_tokens: u32,
    /// Deadline of a single provider call, in seconds.
    pub timeout_secs: u64,
}

impl Default for FileRunConfig {
    fn default() -> Self {
        Self {
            corpus: None,
            concurrency: 4,
            temperature: 0.7,
            max_tokens: 150,
            sample_max_tokens: 150,
            timeout_secs: 30,
        }
    }
}
