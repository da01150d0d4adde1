//! Annotated dialect: one `E999` pseudo-diagnostic per violation.
//!
//! The `path:line: CODE message` shape is what editor and CI problem
//! matchers pick up, so every line starts with the violation's first line.

use super::ReportDialect;
use crate::violation::LineViolation;

pub const ERROR_CODE: &str = "E999";

pub struct AnnotatedReportGenerator;

impl ReportDialect for AnnotatedReportGenerator {
    fn violation_line(&self, path: &str, violation: &LineViolation) -> String {
        let start = violation.start();
        match violation.end() {
            Some(end) => {
                format!("{path}:{start}: {ERROR_CODE} Lines {start}-{end} are not covered in tests!")
            }
            None => format!("{path}:{start}: {ERROR_CODE} Line {start} is not covered in tests!"),
        }
    }

    fn includes_summary(&self) -> bool {
        false
    }
}
