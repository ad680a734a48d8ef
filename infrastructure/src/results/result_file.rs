//! Result file schema

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;
use veracity_application::BenchmarkRun;
use veracity_domain::{DetectionConfig, EvaluationRecord, ResultAggregator, RunSummary};

/// Version written to and accepted from result files
pub const RESULT_SCHEMA_VERSION: u64 = 1;

#[derive(Error, Debug)]
pub enum ResultFileError {
    #[error("Failed to access result file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Result file is not valid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported result schema version {found} (expected {RESULT_SCHEMA_VERSION})")]
    UnsupportedVersion { found: String },
}

/// Run-level metadata stored alongside the records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub model: String,
    pub provider: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Corpus path as given on the command line
    pub corpus: Option<String>,
    pub question_count: usize,
    pub detection: DetectionConfig,
    /// Temperature of the primary response
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultFile {
    pub schema_version: u64,
    pub run: RunMetadata,
    pub records: Vec<EvaluationRecord>,
    pub summary: RunSummary,
}

impl ResultFile {
    pub fn from_run(
        run: BenchmarkRun,
        provider: impl Into<String>,
        model: impl Into<String>,
        corpus: Option<String>,
        detection: DetectionConfig,
        temperature: f64,
    ) -> Self {
        Self {
            schema_version: RESULT_SCHEMA_VERSION,
            run: RunMetadata {
                model: model.into(),
                provider: provider.into(),
                started_at: run.started_at,
                finished_at: run.finished_at,
                corpus,
                question_count: run.records.len(),
                detection,
                temperature,
            },
            records: run.records,
            summary: run.summary,
        }
    }

    /// Parse a result file, rejecting other schema versions.
    pub fn from_json(content: &str) -> Result<Self, ResultFileError> {
        let value: Value = serde_json::from_str(content)?;
        match value.get("schema_version") {
            Some(Value::Number(n)) if n.as_u64() == Some(RESULT_SCHEMA_VERSION) => {}
            Some(other) => {
                return Err(ResultFileError::UnsupportedVersion {
                    found: other.to_string(),
                });
            }
            None => {
                return Err(ResultFileError::UnsupportedVersion {
                    found: "none".to_string(),
                });
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<String, ResultFileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rebuild the summary from the stored records.
    ///
    /// Stored verdicts are taken as they are; detectors are not re-run.
    pub fn reaggregate(&self) -> RunSummary {
        ResultAggregator::from_records(&self.records).finalize()
    }

    /// `provider:model` as shown in reports
    pub fn display_name(&self) -> String {
        format!("{}:{}", self.run.provider, self.run.model)
    }
}
