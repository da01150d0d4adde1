//! Coverage result data handed to the report formatter.
//!
//! Produced by an external coverage tool and treated as a read-only
//! snapshot for the duration of one render.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::violation::LineViolation;

/// Per-file coverage summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileStats {
    /// Percentage of the file's diff lines covered, in [0, 100].
    pub percent_covered: f64,
    /// Uncovered lines, ascending by starting line.
    #[serde(default)]
    pub violation_lines: Vec<LineViolation>,
}

impl FileStats {
    pub fn new(percent_covered: f64, violation_lines: Vec<LineViolation>) -> Self {
        Self {
            percent_covered,
            violation_lines,
        }
    }

    /// Files at 100% are left out of the report entirely.
    pub fn is_fully_covered(&self) -> bool {
        self.percent_covered >= 100.0
    }
}

/// Everything a report renders: diff name, per-file stats, and totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageResult {
    pub diff_name: String,

    /// Keyed by source path. `BTreeMap` keeps paths in lexicographic order,
    /// which the report output depends on.
    #[serde(default)]
    pub src_stats: BTreeMap<String, FileStats>,

    #[serde(default)]
    pub total_num_lines: u64,

    #[serde(default)]
    pub total_num_violations: u64,

    #[serde(default = "full_coverage")]
    pub total_percent_covered: f64,
}

fn full_coverage() -> f64 {
    100.0
}

impl CoverageResult {
    /// An empty result: no files, zero lines, 100% covered.
    pub fn new(diff_name: impl Into<String>) -> Self {
        Self {
            diff_name: diff_name.into(),
            src_stats: BTreeMap::new(),
            total_num_lines: 0,
            total_num_violations: 0,
            total_percent_covered: full_coverage(),
        }
    }

    /// Builder-style insert of one file's stats.
    pub fn with_file(mut self, path: impl Into<String>, stats: FileStats) -> Self {
        self.src_stats.insert(path.into(), stats);
        self
    }

    /// Builder-style override of the aggregate totals.
    pub fn with_totals(mut self, num_lines: u64, num_violations: u64, percent: f64) -> Self {
        self.total_num_lines = num_lines;
        self.total_num_violations = num_violations;
        self.total_percent_covered = percent;
        self
    }

    pub fn has_coverage_info(&self) -> bool {
        !self.src_stats.is_empty()
    }

    /// Files that contribute lines to the report, in path order.
    pub fn files_with_violations(&self) -> impl Iterator<Item = (&str, &FileStats)> {
        self.src_stats
            .iter()
            .filter(|(_, stats)| !stats.is_fully_covered())
            .map(|(path, stats)| (path.as_str(), stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_result_defaults() {
        let result = CoverageResult::new("master...HEAD");
        assert_eq!(result.diff_name, "master...HEAD");
        assert!(!result.has_coverage_info());
        assert_eq!(result.total_num_lines, 0);
        assert_eq!(result.total_num_violations, 0);
        assert_eq!(result.total_percent_covered, 100.0);
    }

    #[test]
    fn files_with_violations_skips_full_coverage_and_sorts() {
        let result = CoverageResult::new("d")
            .with_file("z.py", FileStats::new(50.0, vec![LineViolation::Line(1)]))
            .with_file("a.py", FileStats::new(100.0, vec![]))
            .with_file("m.py", FileStats::new(0.0, vec![LineViolation::Line(2)]));

        let paths: Vec<&str> = result.files_with_violations().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["m.py", "z.py"]);
    }

    #[test]
    fn deserializes_with_missing_totals() {
        let json = r#"{
            "diff_name": "origin/main...HEAD",
            "src_stats": {
                "b.py": {"percent_covered": 75.0, "violation_lines": ["3", "7-9"]}
            }
        }"#;
        let result: CoverageResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.total_percent_covered, 100.0);
        assert_eq!(result.total_num_lines, 0);
        let stats = &result.src_stats["b.py"];
        assert_eq!(
            stats.violation_lines,
            vec![LineViolation::Line(3), LineViolation::Range { start: 7, end: 9 }]
        );
    }

    #[test]
    fn violation_lines_default_to_empty() {
        let stats: FileStats = serde_json::from_str(r#"{"percent_covered": 100}"#).unwrap();
        assert!(stats.violation_lines.is_empty());
        assert!(stats.is_fully_covered());
    }
}
