//! Partial-line patch construction for staging and unstaging.
//!
//! Given one hunk and a set of selected line positions, [`select_lines`] rewrites the
//! hunk so that applying it touches only the selected changes:
//!
//! | line               | [`PatchDirection::Stage`] | [`PatchDirection::Unstage`] |
//! |--------------------|---------------------------|-----------------------------|
//! | context            | kept                      | kept                        |
//! | selected change    | kept                      | kept                        |
//! | unselected `+`     | dropped                   | becomes context             |
//! | unselected `-`     | becomes context           | dropped                     |
//!
//! Stage patches are built from the worktree diff and applied to the index. Unstage
//! patches are built from the staged diff and applied in reverse, so the roles of
//! additions and deletions swap. Counts are recomputed from the rewritten lines and
//! a selection with no remaining change yields `None`, never an empty patch.

use crate::core::hunk::{build_hunks_patch, format_hunk_header, DiffHunk, DiffLine, LineKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchDirection {
    Stage,
    Unstage,
}

/// Rewrite `hunk` keeping only the changes at the `selected` indices of `hunk.lines`.
pub fn select_lines(
    hunk: &DiffHunk,
    selected: &BTreeSet<usize>,
    direction: PatchDirection,
) -> Option<DiffHunk> {
    let mut lines: Vec<DiffLine> = Vec::with_capacity(hunk.lines.len());
    let mut has_change = false;

    for (index, line) in hunk.lines.iter().enumerate() {
        let is_selected = selected.contains(&index);
        match (line.kind, is_selected, direction) {
            (LineKind::Context, _, _) => lines.push(line.clone()),
            (_, true, _) => {
                has_change = true;
                lines.push(line.clone());
            }
            (LineKind::Addition, false, PatchDirection::Stage)
            | (LineKind::Deletion, false, PatchDirection::Unstage) => {}
            (LineKind::Deletion, false, PatchDirection::Stage)
            | (LineKind::Addition, false, PatchDirection::Unstage) => {
                let mut context = line.clone();
                context.kind = LineKind::Context;
                lines.push(context);
            }
        }
    }

    if !has_change {
        log::debug!("selection leaves no change in hunk {:?}", hunk.header);
        return None;
    }

    if direction == PatchDirection::Stage {
        bridge_missing_newline(&mut lines);
    }
    terminate_written_lines(&mut lines, direction);

    Some(renumber(hunk, lines, direction))
}

/// Only the last line of the side being written may lack a trailing newline.
///
/// The written side is the new side when staging and the old side when unstaging,
/// since unstage patches are applied in reverse. A selected change that is followed
/// by more lines of that side gets its newline back.
fn terminate_written_lines(lines: &mut [DiffLine], direction: PatchDirection) {
    let (written, on_side): (LineKind, fn(LineKind) -> bool) = match direction {
        PatchDirection::Stage => (LineKind::Addition, LineKind::in_new),
        PatchDirection::Unstage => (LineKind::Deletion, LineKind::in_old),
    };
    let Some(last) = lines.iter().rposition(|l| on_side(l.kind)) else {
        return;
    };
    for line in &mut lines[..last] {
        if line.kind == written && line.missing_newline {
            line.missing_newline = false;
        }
    }
}

/// A demoted last line without a trailing newline cannot be followed by additions.
/// Replace it with a deletion and an identical addition that does end in a newline.
fn bridge_missing_newline(lines: &mut Vec<DiffLine>) {
    let Some(position) = lines
        .iter()
        .position(|l| l.kind == LineKind::Context && l.missing_newline)
    else {
        return;
    };
    if position + 1 == lines.len() {
        return;
    }
    let mut deletion = lines[position].clone();
    deletion.kind = LineKind::Deletion;
    let mut addition = lines[position].clone();
    addition.kind = LineKind::Addition;
    addition.missing_newline = false;
    lines[position] = deletion;
    lines.insert(position + 1, addition);
}

/// Normalised first-line position of a range; a zero-count range names the line before it
fn anchor(start: u32, count: u32) -> i64 {
    if count == 0 {
        i64::from(start) + 1
    } else {
        i64::from(start)
    }
}

fn from_anchor(anchor: i64, count: u32) -> u32 {
    let start = if count == 0 { anchor - 1 } else { anchor };
    u32::try_from(start.max(0)).unwrap_or(0)
}

/// Recompute counts and line numbers for rewritten `lines`.
///
/// The side left untouched by the direction keeps its start; the other side keeps
/// the original offset between the two starts.
fn renumber(original: &DiffHunk, mut lines: Vec<DiffLine>, direction: PatchDirection) -> DiffHunk {
    let old_count = lines.iter().filter(|l| l.kind.in_old()).count() as u32;
    let new_count = lines.iter().filter(|l| l.kind.in_new()).count() as u32;

    let offset = anchor(original.new_start, original.new_count)
        - anchor(original.old_start, original.old_count);
    let (old_start, new_start) = match direction {
        PatchDirection::Stage => {
            let old_start = original.old_start;
            let new_anchor = anchor(old_start, old_count) + offset;
            (old_start, from_anchor(new_anchor, new_count))
        }
        PatchDirection::Unstage => {
            let new_start = original.new_start;
            let old_anchor = anchor(new_start, new_count) - offset;
            (from_anchor(old_anchor, old_count), new_start)
        }
    };

    let mut old_line = anchor(old_start, old_count) as u32;
    let mut new_line = anchor(new_start, new_count) as u32;
    for line in &mut lines {
        line.old_line = None;
        line.new_line = None;
        if line.kind.in_old() {
            line.old_line = Some(old_line);
            old_line += 1;
        }
        if line.kind.in_new() {
            line.new_line = Some(new_line);
            new_line += 1;
        }
    }

    DiffHunk {
        header: format_hunk_header(old_start, old_count, new_start, new_count, original.section()),
        old_start,
        old_count,
        new_start,
        new_count,
        lines,
    }
}

/// Patch applying only the selected lines of `hunk`, or `None` when nothing is selected
pub fn build_lines_patch(
    path: &str,
    hunk: &DiffHunk,
    selected: &BTreeSet<usize>,
    direction: PatchDirection,
) -> Option<String> {
    let rewritten = select_lines(hunk, selected, direction)?;
    Some(build_hunks_patch(path, std::slice::from_ref(&rewritten)))
}

/// Arguments for `git apply` that stage or unstage a patch for `path` read from stdin
pub fn apply_arguments(path: &str, hunks: &[DiffHunk], direction: PatchDirection) -> Vec<String> {
    let mut args = vec!["apply".to_string(), "--cached".to_string()];
    if direction == PatchDirection::Unstage {
        args.push("--reverse".to_string());
    }
    if hunks.iter().any(|h| !h.has_context()) {
        args.push("--unidiff-zero".to_string());
    }
    args.push("--whitespace=nowarn".to_string());
    args.push(format!("--include={path}"));
    args.push("-".to_string());
    args
}
