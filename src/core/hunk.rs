//! Unified diff parsing and whole-hunk patch construction.
//!
//! [`parse_diff_hunks`] turns the diff text for one file into [`DiffHunk`] values
//! whose lines carry old/new line numbers. [`build_hunks_patch`] serialises hunks
//! back into a patch that `git apply` accepts for that file.
//!
//! # Public API
//! - [`DiffHunk`], [`DiffLine`], [`LineKind`]: the display model
//! - [`HunkHeader`], [`parse_hunk_header`]: `@@ -a,b +c,d @@` parsing
//! - [`parse_diff_hunks`]: tolerant parser, malformed hunks are skipped
//! - [`build_hunks_patch`]: file header plus hunks, unchanged
//!
//! A range without a count (`@@ -10 +10,2 @@`) has a count of one, matching what
//! git prints for single-line ranges.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Context,
    Addition,
    Deletion,
}

impl LineKind {
    pub fn prefix(self) -> char {
        match self {
            LineKind::Context => ' ',
            LineKind::Addition => '+',
            LineKind::Deletion => '-',
        }
    }

    pub fn is_change(self) -> bool {
        !matches!(self, LineKind::Context)
    }

    /// Whether the line exists in the old version
    pub fn in_old(self) -> bool {
        !matches!(self, LineKind::Addition)
    }

    /// Whether the line exists in the new version
    pub fn in_new(self) -> bool {
        !matches!(self, LineKind::Deletion)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub kind: LineKind,
    /// Text without the leading marker
    pub content: String,
    pub old_line: Option<u32>,
    pub new_line: Option<u32>,
    /// Followed by `\ No newline at end of file`
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub missing_newline: bool,
}

impl DiffLine {
    pub fn new(kind: LineKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            old_line: None,
            new_line: None,
            missing_newline: false,
        }
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.content)?;
        if self.missing_newline {
            write!(f, "\n{NO_NEWLINE_MARKER}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffHunk {
    /// Header line exactly as git printed it
    pub header: String,
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    pub lines: Vec<DiffLine>,
}

impl DiffHunk {
    /// Function context git appends after the closing `@@`, including its leading space
    pub fn section(&self) -> &str {
        parse_hunk_header(&self.header)
            .map(|h| h.section)
            .unwrap_or("")
    }

    /// Indices into `lines` of the additions and deletions, in order
    pub fn change_line_indices(&self) -> Vec<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.kind.is_change())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn has_context(&self) -> bool {
        self.lines.iter().any(|l| l.kind == LineKind::Context)
    }

    pub fn additions(&self) -> usize {
        self.lines.iter().filter(|l| l.kind == LineKind::Addition).count()
    }

    pub fn deletions(&self) -> usize {
        self.lines.iter().filter(|l| l.kind == LineKind::Deletion).count()
    }
}

impl fmt::Display for DiffHunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkHeader<'a> {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    pub section: &'a str,
}

fn parse_range(range: &str) -> Option<(u32, u32)> {
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

pub fn parse_hunk_header(line: &str) -> Option<HunkHeader<'_>> {
    let rest = line.strip_prefix("@@ ")?;
    let (ranges, section) = rest.split_once(" @@")?;
    let (old, new) = ranges.split_once(' ')?;
    let (old_start, old_count) = parse_range(old.strip_prefix('-')?)?;
    let (new_start, new_count) = parse_range(new.strip_prefix('+')?)?;
    Some(HunkHeader {
        old_start,
        old_count,
        new_start,
        new_count,
        section,
    })
}

fn format_range(start: u32, count: u32) -> String {
    if count == 1 {
        start.to_string()
    } else {
        format!("{start},{count}")
    }
}

/// Render a header the way git does, omitting `,1` counts
pub fn format_hunk_header(
    old_start: u32,
    old_count: u32,
    new_start: u32,
    new_count: u32,
    section: &str,
) -> String {
    format!(
        "@@ -{} +{} @@{}",
        format_range(old_start, old_count),
        format_range(new_start, new_count),
        section
    )
}

struct OpenHunk {
    hunk: DiffHunk,
    old_line: u32,
    new_line: u32,
}

impl OpenHunk {
    fn push(&mut self, kind: LineKind, content: &str) {
        let mut line = DiffLine::new(kind, content);
        if kind.in_old() {
            line.old_line = Some(self.old_line);
            self.old_line += 1;
        }
        if kind.in_new() {
            line.new_line = Some(self.new_line);
            self.new_line += 1;
        }
        self.hunk.lines.push(line);
    }
}

/// Parse the unified diff of a single file into hunks.
///
/// Everything before the first hunk header is file metadata and is skipped. A
/// malformed header discards lines up to the next recognisable header, and a
/// `diff --git` line closes the current hunk.
pub fn parse_diff_hunks(diff: &str) -> Vec<DiffHunk> {
    let mut hunks = Vec::new();
    let mut open: Option<OpenHunk> = None;

    for raw in diff.split_terminator('\n') {
        if raw.starts_with("@@") {
            hunks.extend(open.take().map(|o| o.hunk));
            match parse_hunk_header(raw) {
                Some(header) => {
                    open = Some(OpenHunk {
                        hunk: DiffHunk {
                            header: raw.to_string(),
                            old_start: header.old_start,
                            old_count: header.old_count,
                            new_start: header.new_start,
                            new_count: header.new_count,
                            lines: Vec::new(),
                        },
                        old_line: header.old_start,
                        new_line: header.new_start,
                    })
                }
                None => log::debug!("skipping hunk with malformed header {raw:?}"),
            }
            continue;
        }
        if raw.starts_with("diff --git ") {
            hunks.extend(open.take().map(|o| o.hunk));
            continue;
        }
        let Some(current) = open.as_mut() else {
            continue;
        };
        if let Some(content) = raw.strip_prefix('+') {
            current.push(LineKind::Addition, content);
        } else if let Some(content) = raw.strip_prefix('-') {
            current.push(LineKind::Deletion, content);
        } else if raw.starts_with('\\') {
            if let Some(last) = current.hunk.lines.last_mut() {
                last.missing_newline = true;
            }
        } else {
            current.push(LineKind::Context, raw.strip_prefix(' ').unwrap_or(raw));
        }
    }
    hunks.extend(open.map(|o| o.hunk));
    hunks
}

/// Patch for `path` containing `hunks` exactly as parsed
pub fn build_hunks_patch(path: &str, hunks: &[DiffHunk]) -> String {
    let mut patch = format!("--- a/{path}\n+++ b/{path}\n");
    for hunk in hunks {
        patch.push_str(&hunk.to_string());
    }
    patch
}
