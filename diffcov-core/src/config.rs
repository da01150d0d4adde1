//! Report configuration loaded from TOML.
//!
//! ```toml
//! format = "annotated"
//! compare_branch = "origin/main"
//! fail_under = 80.0
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::report::ReportMode;

pub const DEFAULT_COMPARE_BRANCH: &str = "master";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("fail_under must be within 0..=100, got {0}")]
    FailUnderOutOfRange(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Output dialect.
    pub format: ReportMode,

    /// Branch the committed diff is taken against (`{branch}...HEAD`).
    pub compare_branch: String,

    /// Minimum total coverage percentage; below it the run fails.
    pub fail_under: Option<f64>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportMode::Plain,
            compare_branch: DEFAULT_COMPARE_BRANCH.to_string(),
            fail_under: None,
        }
    }
}

impl ReportConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(threshold) = self.fail_under {
            if !(0.0..=100.0).contains(&threshold) {
                return Err(ConfigError::FailUnderOutOfRange(threshold));
            }
        }
        Ok(())
    }

    /// True when `percent` is below the configured threshold.
    pub fn fails(&self, percent: f64) -> bool {
        self.fail_under.is_some_and(|threshold| percent < threshold)
    }
}
