//! Terminal colors for file statuses, graph lanes and diff lines.
//!
//! # Public API
//! - [`get_status_color_style`]: color function for a git status
//! - [`get_aligned_status`]: status code padded to two columns and colored
//! - [`get_colored_path`]: path in its status color
//! - [`format_file_entry`]: one numbered status line
//! - [`lane_color`] / [`paint_lane`]: graph lane palette, color key 0 being the main chain
//! - [`paint_diff_line`]: diff line in its `+`/`-`/context color
//!
//! # Color Scheme
//! - **Modified**: yellow
//! - **Added**: green
//! - **Deleted**: red
//! - **Renamed/Copied**: blue
//! - **Untracked**: cyan
//! - **Unmerged**: red bold

use crate::core::git_status::GitStatus;
use crate::core::graph::ColorKey;
use crate::core::hunk::LineKind;
use crate::core::state::FileEntry;
use colored::*;

pub fn get_status_color_style(status: GitStatus) -> Box<dyn Fn(&str) -> ColoredString> {
    match status {
        GitStatus::Modified => Box::new(|text: &str| text.yellow()),
        GitStatus::Untracked => Box::new(|text: &str| text.cyan()),
        GitStatus::Deleted => Box::new(|text: &str| text.red()),
        GitStatus::Added => Box::new(|text: &str| text.green()),
        GitStatus::Renamed | GitStatus::Copied => Box::new(|text: &str| text.blue()),
        GitStatus::TypeChanged => Box::new(|text: &str| text.magenta()),
        GitStatus::Unmerged => Box::new(|text: &str| text.red().bold()),
    }
}

/// Status code padded to two columns
pub fn get_aligned_status(status: GitStatus) -> ColoredString {
    let color_fn = get_status_color_style(status);
    let code = status.as_str();
    if code.len() == 2 {
        color_fn(code)
    } else {
        color_fn(&format!("{code} "))
    }
}

pub fn get_colored_path(status: GitStatus, path: &str) -> ColoredString {
    get_status_color_style(status)(path)
}

pub fn format_file_entry(entry: &FileEntry) -> String {
    let index = format!("[{}]", entry.index).cyan().bold();
    let status = get_aligned_status(entry.status);
    let path = match &entry.original_path {
        Some(original) => format!("{} -> {}", original.display(), entry.path.display()),
        None => entry.path.display().to_string(),
    };
    format!("{index} {status} {}", get_colored_path(entry.status, &path))
}

const LANE_PALETTE: [Color; 8] = [
    Color::BrightBlue,
    Color::Green,
    Color::Magenta,
    Color::Yellow,
    Color::Cyan,
    Color::Red,
    Color::BrightGreen,
    Color::BrightMagenta,
];

/// Terminal color for a lane color key; keys cycle through a fixed palette
pub fn lane_color(key: ColorKey) -> Color {
    LANE_PALETTE[key.0 as usize % LANE_PALETTE.len()]
}

pub fn paint_lane(text: &str, key: ColorKey) -> ColoredString {
    let painted = text.color(lane_color(key));
    if key == ColorKey::MAIN {
        painted.bold()
    } else {
        painted
    }
}

pub fn paint_diff_line(kind: LineKind, text: &str) -> ColoredString {
    match kind {
        LineKind::Addition => text.green(),
        LineKind::Deletion => text.red(),
        LineKind::Context => text.normal(),
    }
}
