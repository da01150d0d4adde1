//! Report rendering in the plain and annotated text dialects.
//!
//! Both dialects share the same control flow:
//! 1. header (title, diff name, separator)
//! 2. early exit with a notice when there is no coverage information
//! 3. one line per violation for every file below 100%, in path order
//! 4. a totals block, plain dialect only

mod annotated;
mod plain;
mod summary;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::str::FromStr;
use thiserror::Error;

use crate::model::CoverageResult;
use crate::violation::LineViolation;

pub use annotated::AnnotatedReportGenerator;
pub use plain::PlainReportGenerator;
pub use summary::{pluralize, SummaryStats};

pub const TITLE: &str = "Diff Coverage";
pub const SEPARATOR: &str = "-------------";
pub const NO_COVERAGE_MESSAGE: &str = "No lines with coverage information in this diff.";

/// Output dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Human-readable listing with a totals block.
    #[default]
    Plain,
    /// `path:line: E999 ...` pseudo-diagnostics, no totals.
    Annotated,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown report format '{0}'. Valid: plain, annotated")]
pub struct ReportModeParseError(String);

impl FromStr for ReportMode {
    type Err = ReportModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "annotated" => Ok(Self::Annotated),
            _ => Err(ReportModeParseError(s.to_string())),
        }
    }
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => f.write_str("plain"),
            Self::Annotated => f.write_str("annotated"),
        }
    }
}

/// The per-dialect parts of a report.
pub trait ReportDialect {
    /// One output line (without newline) for a single violation in `path`.
    fn violation_line(&self, path: &str, violation: &LineViolation) -> String;

    /// Whether the totals block follows the violation listing.
    fn includes_summary(&self) -> bool;

    /// Render a complete report.
    fn generate(&self, result: &CoverageResult) -> String {
        let mut report = format!("{TITLE}\nDiff: {}\n{SEPARATOR}\n", result.diff_name);

        if !result.has_coverage_info() {
            report.push_str(NO_COVERAGE_MESSAGE);
            report.push('\n');
            report.push_str(SEPARATOR);
            report.push('\n');
            return report;
        }

        for (path, stats) in result.files_with_violations() {
            for violation in &stats.violation_lines {
                report.push_str(&self.violation_line(path, violation));
                report.push('\n');
            }
        }

        if self.includes_summary() {
            SummaryStats::from_result(result).push_block(&mut report);
        }

        report
    }
}

/// Render `result` in the given dialect.
pub fn render(result: &CoverageResult, mode: ReportMode) -> String {
    match mode {
        ReportMode::Plain => PlainReportGenerator.generate(result),
        ReportMode::Annotated => AnnotatedReportGenerator.generate(result),
    }
}

/// Render `result` into any writer.
pub fn write_report<W: io::Write>(
    out: &mut W,
    result: &CoverageResult,
    mode: ReportMode,
) -> io::Result<()> {
    out.write_all(render(result, mode).as_bytes())
}
