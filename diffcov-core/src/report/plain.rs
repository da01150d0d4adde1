//! Plain text dialect.

use super::ReportDialect;
use crate::violation::LineViolation;

/// `path:token: Line not covered!` per violation, followed by totals.
///
/// A range prints once with its `start-end` token; it is not expanded
/// into one line per source line.
pub struct PlainReportGenerator;

impl ReportDialect for PlainReportGenerator {
    fn violation_line(&self, path: &str, violation: &LineViolation) -> String {
        format!("{path}:{violation}: Line not covered!")
    }

    fn includes_summary(&self) -> bool {
        true
    }
}
