//! Uncovered line tokens: a single line (`"10"`) or a contiguous range (`"10-15"`).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between the start and end of a range token.
pub const RANGE_SEPARATOR: char = '-';

/// A line (or run of lines) changed in the diff but not covered by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawViolation", into = "String")]
pub enum LineViolation {
    Line(u32),
    /// Inclusive range, `end > start`.
    Range { start: u32, end: u32 },
}

/// Errors from parsing a violation token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViolationParseError {
    #[error("invalid line number in violation token '{token}'")]
    InvalidNumber { token: String },
    #[error("violation token '{token}' has more than one '-' separator")]
    TooManySeparators { token: String },
    #[error("range ends before it starts: {start}-{end}")]
    Reversed { start: u32, end: u32 },
}

impl LineViolation {
    /// Build a range violation. A one-line range collapses to `Line`.
    pub fn range(start: u32, end: u32) -> Result<Self, ViolationParseError> {
        match end.cmp(&start) {
            Ordering::Greater => Ok(Self::Range { start, end }),
            Ordering::Equal => Ok(Self::Line(start)),
            Ordering::Less => Err(ViolationParseError::Reversed { start, end }),
        }
    }

    pub fn start(&self) -> u32 {
        match *self {
            Self::Line(line) => line,
            Self::Range { start, .. } => start,
        }
    }

    /// End of the range, `None` for a single line.
    pub fn end(&self) -> Option<u32> {
        match *self {
            Self::Line(_) => None,
            Self::Range { end, .. } => Some(end),
        }
    }
}

impl fmt::Display for LineViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(line) => write!(f, "{line}"),
            Self::Range { start, end } => write!(f, "{start}{RANGE_SEPARATOR}{end}"),
        }
    }
}

impl FromStr for LineViolation {
    type Err = ViolationParseError;

    /// Split once on `-`. An absent or empty end means a single line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let (start, end) = match token.split_once(RANGE_SEPARATOR) {
            Some((start, end)) => (start, Some(end.trim())),
            None => (token, None),
        };
        let start = parse_line(start, token)?;

        match end.filter(|e| !e.is_empty()) {
            None => Ok(Self::Line(start)),
            Some(end) if end.contains(RANGE_SEPARATOR) => {
                Err(ViolationParseError::TooManySeparators {
                    token: token.to_string(),
                })
            }
            Some(end) => Self::range(start, parse_line(end, token)?),
        }
    }
}

fn parse_line(part: &str, token: &str) -> Result<u32, ViolationParseError> {
    part.trim()
        .parse()
        .map_err(|_| ViolationParseError::InvalidNumber {
            token: token.to_string(),
        })
}

impl From<LineViolation> for String {
    fn from(v: LineViolation) -> Self {
        v.to_string()
    }
}

/// Wire forms accepted on input: `10`, `"10"`, `"10-15"`, or `[10, 15]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawViolation {
    Line(u32),
    Pair(u32, u32),
    Token(String),
}

impl TryFrom<RawViolation> for LineViolation {
    type Error = ViolationParseError;

    fn try_from(raw: RawViolation) -> Result<Self, Self::Error> {
        match raw {
            RawViolation::Line(line) => Ok(Self::Line(line)),
            RawViolation::Pair(start, end) => Self::range(start, end),
            RawViolation::Token(token) => token.parse(),
        }
    }
}
