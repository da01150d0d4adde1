//! Totals block for the plain dialect.

use super::SEPARATOR;
use crate::model::CoverageResult;

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub total_lines: u64,
    pub missing_lines: u64,
    pub percent_covered: f64,
}

impl SummaryStats {
    pub fn from_result(result: &CoverageResult) -> Self {
        Self {
            total_lines: result.total_num_lines,
            missing_lines: result.total_num_violations,
            percent_covered: result.total_percent_covered,
        }
    }

    /// Append separator, totals, and closing separator.
    ///
    /// `f64` display drops the fraction for integral values (`100`, not `100.0`).
    pub fn push_block(&self, report: &mut String) {
        report.push_str(&format!(
            "{SEPARATOR}\n\
Total:   {} {}\n\
Missing: {} {}\n\
Coverage: {}%\n\
{SEPARATOR}\n",
            self.total_lines,
            pluralize(self.total_lines, "line"),
            self.missing_lines,
            pluralize(self.missing_lines, "line"),
            self.percent_covered,
        ));
    }
}

/// `noun` when `count == 1`, otherwise `noun` + "s".
pub fn pluralize(count: u64, noun: &str) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pluralize_counts() {
        assert_eq!(pluralize(0, "line"), "lines");
        assert_eq!(pluralize(1, "line"), "line");
        assert_eq!(pluralize(2, "line"), "lines");
    }

    #[test]
    fn block_singular_and_fractional() {
        let stats = SummaryStats {
            total_lines: 1,
            missing_lines: 3,
            percent_covered: 66.5,
        };
        let mut out = String::new();
        stats.push_block(&mut out);
        assert_eq!(
            out,
            "-------------\nTotal:   1 line\nMissing: 3 lines\nCoverage: 66.5%\n-------------\n"
        );
    }

    #[test]
    fn from_result_copies_totals() {
        let result = CoverageResult::new("d").with_totals(12, 4, 66.0);
        let stats = SummaryStats::from_result(&result);
        assert_eq!(stats.total_lines, 12);
        assert_eq!(stats.missing_lines, 4);
        assert_eq!(stats.percent_covered, 66.0);
    }
}
