//! Loading coverage results from JSON.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::model::CoverageResult;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read coverage data from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed coverage data: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoverageResult {
    /// Parse a result from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Read and parse a coverage result file.
pub fn load_result(path: &Path) -> Result<CoverageResult, LoadError> {
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let result = CoverageResult::from_json(&json)?;
    debug!(
        path = %path.display(),
        files = result.src_stats.len(),
        "loaded coverage result"
    );
    Ok(result)
}
