//! `DiffSource` backed by the `git` executable.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use super::{DiffSource, GitDiffError};

/// Flags shared by every diff: no external drivers, no color, no context
/// lines, and `a/` `b/` prefixes even when `diff.noprefix` is configured.
const DIFF_FLAGS: [&str; 5] = [
    "--no-ext-diff",
    "--no-color",
    "-U0",
    "--src-prefix=a/",
    "--dst-prefix=b/",
];

#[derive(Debug, Clone, Default)]
pub struct GitDiffTool {
    repo_dir: Option<PathBuf>,
}

impl GitDiffTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run git inside `dir` instead of the current directory.
    pub fn in_repo(dir: impl AsRef<Path>) -> Self {
        Self {
            repo_dir: Some(dir.as_ref().to_path_buf()),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, GitDiffError> {
        let mut cmd = Command::new("git");
        cmd.args(args);
        if let Some(dir) = &self.repo_dir {
            cmd.current_dir(dir);
        }
        debug!(args = ?args, "running git");

        let output = cmd.output()?;
        if !output.status.success() {
            return Err(GitDiffError::Exit {
                args: args.join(" "),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn diff(&self, leading: &[&str]) -> Result<String, GitDiffError> {
        let mut args = vec!["diff"];
        args.extend_from_slice(leading);
        args.extend_from_slice(&DIFF_FLAGS);
        self.run(&args)
    }
}

impl DiffSource for GitDiffTool {
    fn diff_committed(&self, compare_branch: &str) -> Result<String, GitDiffError> {
        let range = format!("{compare_branch}...HEAD");
        self.diff(&[&range])
    }

    fn diff_staged(&self) -> Result<String, GitDiffError> {
        self.diff(&["--cached"])
    }

    fn diff_unstaged(&self) -> Result<String, GitDiffError> {
        self.diff(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{parse_diff, GitDiffReporter};
    use std::fs;

    fn git_available() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    /// A fresh repository holding one commit of `tracked.txt` with five lines.
    fn committed_repo() -> (tempfile::TempDir, GitDiffTool) {
        let dir = tempfile::tempdir().unwrap();
        let tool = GitDiffTool::in_repo(dir.path());
        tool.run(&["init", "-q"]).unwrap();
        fs::write(dir.path().join("tracked.txt"), "1\n2\n3\n4\n5\n").unwrap();
        tool.run(&["add", "tracked.txt"]).unwrap();
        tool.run(&[
            "-c",
            "user.name=diffcov",
            "-c",
            "user.email=diffcov@example.com",
            "-c",
            "commit.gpgsign=false",
            "commit",
            "-q",
            "-m",
            "init",
        ])
        .unwrap();
        (dir, tool)
    }

    #[test]
    fn unstaged_edit_shows_up_in_working_tree_diff() {
        if !git_available() {
            eprintln!("git not found, skipping");
            return;
        }
        let (dir, tool) = committed_repo();
        fs::write(dir.path().join("tracked.txt"), "1\n2\nthree\n4\n5\n6\n").unwrap();

        let text = tool.diff_unstaged().unwrap();
        assert!(text.contains("diff --git a/tracked.txt b/tracked.txt"), "{text}");
        assert!(tool.diff_staged().unwrap().is_empty());

        let hunks = parse_diff(&text).unwrap();
        assert_eq!(hunks["tracked.txt"], vec![(3, 4), (6, 7)]);
    }

    #[test]
    fn reporter_reads_staged_and_unstaged_changes() {
        if !git_available() {
            eprintln!("git not found, skipping");
            return;
        }
        let (dir, tool) = committed_repo();
        fs::write(dir.path().join("New File.txt"), "a\nb\n").unwrap();
        tool.run(&["add", "New File.txt"]).unwrap();
        fs::write(dir.path().join("tracked.txt"), "0\n1\n2\n3\n4\n5\n").unwrap();

        let reporter = GitDiffReporter::new(tool).with_compare_branch("HEAD");
        assert_eq!(
            reporter.src_paths_changed().unwrap(),
            vec!["New File.txt", "tracked.txt"]
        );
        assert_eq!(reporter.hunks_changed("New File.txt").unwrap(), vec![(1, 3)]);
        assert_eq!(reporter.hunks_changed("tracked.txt").unwrap(), vec![(1, 2)]);
    }

    #[test]
    fn missing_repo_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let tool = GitDiffTool::in_repo(dir.path().join("does-not-exist"));
        assert!(tool.diff_staged().is_err());
    }
}
