//! Result directory layout

use super::result_file::{ResultFile, ResultFileError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes result files and text reports into one directory
///
/// File names are `<provider>_<model>_<start time>.json`, with a `.txt`
/// report of the same stem next to it.
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, file: &ResultFile) -> PathBuf {
        let stem = format!(
            "{}_{}_{}",
            sanitize(&file.run.provider),
            sanitize(&file.run.model),
            file.run.started_at.format("%Y%m%dT%H%M%SZ")
        );
        self.dir.join(format!("{}.json", stem))
    }

    /// Write the result file, creating the directory if needed.
    pub fn write(&self, file: &ResultFile) -> Result<PathBuf, ResultFileError> {
        fs::create_dir_all(&self.dir).map_err(|source| ResultFileError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(file);
        fs::write(&path, file.to_json()?).map_err(|source| ResultFileError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), records = file.records.len(), "Result file written");
        Ok(path)
    }

    /// Write a plain-text report next to `result_path`.
    pub fn write_report(
        &self,
        result_path: &Path,
        report: &str,
    ) -> Result<PathBuf, ResultFileError> {
        let path = result_path.with_extension("txt");
        fs::write(&path, report).map_err(|source| ResultFileError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    pub fn read(path: &Path) -> Result<ResultFile, ResultFileError> {
        let content = fs::read_to_string(path).map_err(|source| ResultFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ResultFile::from_json(&content)
    }
}

/// Keep file names portable: anything outside `[A-Za-z0-9._-]` becomes `-`.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect()
}
