//! Git diff reporter — which source paths and lines a diff touches.
//!
//! A diff here is the union of three git diffs:
//! - committed: `{compare_branch}...HEAD`
//! - staged: `--cached`
//! - unstaged: the working tree

mod git;
mod parser;

use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

use crate::config::DEFAULT_COMPARE_BRANCH;

pub use git::GitDiffTool;
pub use parser::{merge_ranges, parse_diff, DiffHunks, LineRange};

#[derive(Debug, Error)]
pub enum GitDiffError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("`git {args}` exited with {status}: {stderr}")]
    Exit {
        args: String,
        status: String,
        stderr: String,
    },
    #[error("could not parse git diff line '{line}': {reason}")]
    Parse { line: String, reason: &'static str },
}

impl GitDiffError {
    pub(crate) fn parse(line: &str, reason: &'static str) -> Self {
        Self::Parse {
            line: line.to_string(),
            reason,
        }
    }
}

/// Case-insensitive path order, ties broken by byte order.
pub fn sort_paths(paths: &mut [String]) {
    paths.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
}

/// Source of raw `git diff` output.
pub trait DiffSource {
    fn diff_committed(&self, compare_branch: &str) -> Result<String, GitDiffError>;
    fn diff_staged(&self) -> Result<String, GitDiffError>;
    fn diff_unstaged(&self) -> Result<String, GitDiffError>;
}

/// Combines committed, staged, and unstaged changes into one view.
#[derive(Debug, Clone)]
pub struct GitDiffReporter<S> {
    source: S,
    compare_branch: String,
}

impl<S: DiffSource> GitDiffReporter<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            compare_branch: DEFAULT_COMPARE_BRANCH.to_string(),
        }
    }

    pub fn with_compare_branch(mut self, branch: impl Into<String>) -> Self {
        self.compare_branch = branch.into();
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Human-readable name of the diff, used as the report's diff name.
    pub fn name(&self) -> String {
        format!(
            "{}...HEAD, staged, and unstaged changes",
            self.compare_branch
        )
    }

    /// Every path touched by any of the three diffs, sorted case-insensitively.
    pub fn src_paths_changed(&self) -> Result<Vec<String>, GitDiffError> {
        let mut paths: Vec<String> = self
            .all_diffs()?
            .into_iter()
            .flat_map(|hunks| hunks.into_keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        sort_paths(&mut paths);
        Ok(paths)
    }

    /// Merged line ranges changed in `path`. Empty when the path is untouched
    /// or only has deletions.
    pub fn hunks_changed(&self, path: &str) -> Result<Vec<LineRange>, GitDiffError> {
        let ranges: Vec<LineRange> = self
            .all_diffs()?
            .into_iter()
            .filter_map(|mut hunks| hunks.remove(path))
            .flatten()
            .collect();
        Ok(merge_ranges(ranges))
    }

    /// Merged line ranges for every changed path, from a single pass over
    /// the three diffs.
    pub fn all_hunks_changed(&self) -> Result<DiffHunks, GitDiffError> {
        let mut combined = DiffHunks::new();
        for hunks in self.all_diffs()? {
            for (path, ranges) in hunks {
                combined.entry(path).or_default().extend(ranges);
            }
        }
        Ok(combined
            .into_iter()
            .map(|(path, ranges)| (path, merge_ranges(ranges)))
            .collect())
    }

    fn all_diffs(&self) -> Result<[DiffHunks; 3], GitDiffError> {
        let committed = parse_diff(&self.source.diff_committed(&self.compare_branch)?)?;
        let staged = parse_diff(&self.source.diff_staged()?)?;
        let unstaged = parse_diff(&self.source.diff_unstaged()?)?;
        debug!(
            committed = committed.len(),
            staged = staged.len(),
            unstaged = unstaged.len(),
            "parsed git diffs"
        );
        Ok([committed, staged, unstaged])
    }
}
