//! diffcov core — diff coverage data model and report dialects.
//!
//! This crate provides:
//! - The `CoverageResult` model handed over by a coverage tool
//! - Violation tokens (`10`, `10-15`) and their parsing
//! - Plain and annotated report rendering
//! - The git diff reporter: changed paths and merged hunks of a diff
//! - TOML report configuration

pub mod config;
pub mod diff;
pub mod load;
pub mod model;
pub mod report;
pub mod violation;

pub use config::{ConfigError, ReportConfig};
pub use diff::{
    sort_paths, DiffHunks, DiffSource, GitDiffError, GitDiffReporter, GitDiffTool, LineRange,
};
pub use load::{load_result, LoadError};
pub use model::{CoverageResult, FileStats};
pub use report::{render, write_report, ReportDialect, ReportMode, SummaryStats};
pub use violation::{LineViolation, ViolationParseError};
