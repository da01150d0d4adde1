//! Unified diff parsing: changed paths and the new-file line ranges of each hunk.

use std::collections::BTreeMap;
use tracing::trace;

use super::GitDiffError;

/// Changed lines in the new file, `(first_line, first_line + line_count)`.
pub type LineRange = (u32, u32);

/// Path → hunk ranges, in diff order. Paths with no hunks (deleted files,
/// mode changes) are still present with an empty list.
pub type DiffHunks = BTreeMap<String, Vec<LineRange>>;

const FILE_HEADER: &str = "diff --git ";
/// Combined diffs, printed for unmerged paths during a conflict.
const COMBINED_HEADERS: [&str; 2] = ["diff --cc ", "diff --combined "];
const NEW_FILE_MARKER: &str = "+++ ";
const DEV_NULL: &str = "/dev/null";
const HUNK_MARKER: &str = "@@";

/// The file section currently being read.
struct Section {
    path: String,
    /// Whether this section created `path`'s entry, so a `+++` rename may move it.
    created_entry: bool,
    /// Set once the first hunk header is seen; `+++` lines after it are content.
    in_hunks: bool,
}

/// Parse `git diff` output, including combined (`diff --cc`) sections.
pub fn parse_diff(text: &str) -> Result<DiffHunks, GitDiffError> {
    let mut hunks = DiffHunks::new();
    let mut current: Option<Section> = None;

    for line in text.lines() {
        if let Some(path) = parse_file_header(line)? {
            let created_entry = !hunks.contains_key(&path);
            hunks.entry(path.clone()).or_default();
            current = Some(Section {
                path,
                created_entry,
                in_hunks: false,
            });
        } else if line.starts_with(HUNK_MARKER) {
            let Some(section) = current.as_mut() else {
                return Err(GitDiffError::parse(line, "hunk appears before any source file"));
            };
            section.in_hunks = true;
            if let Some(range) = parse_hunk_header(line)? {
                trace!(path = %section.path, start = range.0, end = range.1, "hunk");
                hunks.entry(section.path.clone()).or_default().push(range);
            }
        } else if let Some(target) = line.strip_prefix(NEW_FILE_MARKER) {
            let Some(section) = current.as_mut().filter(|s| !s.in_hunks) else {
                continue;
            };
            // `+++ /dev/null` is a deletion; the header path stands.
            let Some(path) = parse_new_file_path(target) else {
                continue;
            };
            if path != section.path {
                if section.created_entry {
                    hunks.remove(&section.path);
                }
                section.created_entry = !hunks.contains_key(&path);
                hunks.entry(path.clone()).or_default();
                section.path = path;
            }
        }
    }

    Ok(hunks)
}

/// Path named by a `diff --git` or `diff --cc` line, `None` for other lines.
fn parse_file_header(line: &str) -> Result<Option<String>, GitDiffError> {
    if let Some(rest) = line.strip_prefix(FILE_HEADER) {
        return parse_git_header_path(rest)
            .map(Some)
            .ok_or_else(|| GitDiffError::parse(line, "could not find source path"));
    }
    for header in COMBINED_HEADERS {
        if let Some(rest) = line.strip_prefix(header) {
            let rest = rest.trim_end();
            if rest.is_empty() {
                return Err(GitDiffError::parse(line, "could not find source path"));
            }
            return Ok(Some(unquote(rest)));
        }
    }
    Ok(None)
}

/// `a/old b/new` → `new`. Paths may contain spaces or be quoted.
///
/// When the old path itself contains ` b/` this guess is wrong; the
/// section's `+++` line corrects it.
fn parse_git_header_path(rest: &str) -> Option<String> {
    let rest = rest.trim_end();
    let new_path = if rest.ends_with('"') {
        let at = rest.rfind(" \"b/")?;
        unquote(&rest[at + 1..])
    } else {
        let at = rest.rfind(" b/")?;
        rest[at + 1..].to_string()
    };
    new_path
        .strip_prefix("b/")
        .filter(|path| !path.is_empty())
        .map(str::to_string)
}

/// Target of a `+++` line with its `b/` prefix removed; `None` for `/dev/null`.
fn parse_new_file_path(target: &str) -> Option<String> {
    let target = unquote(target.trim_end_matches(['\t', '\r']).trim_end());
    if target == DEV_NULL {
        return None;
    }
    target
        .strip_prefix("b/")
        .filter(|path| !path.is_empty())
        .map(str::to_string)
}

/// Undo git's C-style path quoting: `"caf\303\251.py"` → `café.py`.
/// Unquoted input is returned as is.
fn unquote(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
    else {
        return raw.to_string();
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('n') => bytes.push(b'\n'),
            Some('t') => bytes.push(b'\t'),
            Some('r') => bytes.push(b'\r'),
            Some('a') => bytes.push(0x07),
            Some('b') => bytes.push(0x08),
            Some('f') => bytes.push(0x0c),
            Some('v') => bytes.push(0x0b),
            Some(d @ '0'..='7') => {
                let mut value = d.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                bytes.push((value & 0xff) as u8);
            }
            Some(other) => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
            }
            None => bytes.push(b'\\'),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// `@@ -a,b +c,d @@ ...` → `Some((c, c + d))`, or `None` when `d == 0`.
///
/// Combined headers (`@@@ -a,b -c,d +e,f @@@`) use the same rule on the
/// `+` range. `d` defaults to 1 when omitted (`+c`).
fn parse_hunk_header(line: &str) -> Result<Option<LineRange>, GitDiffError> {
    let depth = line.chars().take_while(|&c| c == '@').count();
    let marker = &line[..depth];
    let inner = line[depth..]
        .split_once(marker)
        .map(|(inner, _)| inner)
        .ok_or_else(|| GitDiffError::parse(line, "unterminated hunk header"))?;

    let added = inner
        .split_whitespace()
        .find_map(|token| token.strip_prefix('+'))
        .ok_or_else(|| GitDiffError::parse(line, "hunk header has no '+' line range"))?;

    let (start, count) = match added.split_once(',') {
        Some((start, count)) => (start, Some(count)),
        None => (added, None),
    };

    let start: u32 = start
        .parse()
        .map_err(|_| GitDiffError::parse(line, "invalid start line"))?;
    let count: u32 = match count {
        Some(count) => count
            .parse()
            .map_err(|_| GitDiffError::parse(line, "invalid line count"))?,
        None => 1,
    };

    if count == 0 {
        return Ok(None);
    }
    Ok(Some((start, start.saturating_add(count))))
}

/// Sort ranges and merge any that overlap or touch.
pub fn merge_ranges(mut ranges: Vec<LineRange>) -> Vec<LineRange> {
    ranges.sort_unstable();
    let mut merged: Vec<LineRange> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}
