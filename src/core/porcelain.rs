//! Parsers for git's line-oriented porcelain formats.
//!
//! These formats predate the separator-based records in [`crate::core::records`]:
//! worktree blocks, blame groups, NUL-separated status entries, `remote -v` lines and
//! `submodule status` lines. Each parser keeps what it can read and drops the rest.

use crate::core::git_status::GitStatus;
use crate::core::records::sentinel_date;
use crate::core::state::{
    BlameEntry, FileEntry, RemoteInfo, SubmoduleInfo, SubmoduleState, Timestamp, WorktreeItem,
};
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use std::path::PathBuf;

/// Parse `git worktree list --porcelain`.
///
/// Blocks are separated by blank lines; a block without a `worktree` line is dropped.
/// The first block is the main worktree.
pub fn parse_worktrees(output: &str) -> Vec<WorktreeItem> {
    fn finish(current: &mut Option<WorktreeItem>, items: &mut Vec<WorktreeItem>) {
        if let Some(mut item) = current.take() {
            item.is_main = items.is_empty();
            items.push(item);
        }
    }

    let mut items = Vec::new();
    let mut current: Option<WorktreeItem> = None;

    for line in output.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            finish(&mut current, &mut items);
            continue;
        }
        let (key, value) = match line.split_once(' ') {
            Some((key, value)) => (key, Some(value)),
            None => (line, None),
        };
        if key == "worktree" {
            finish(&mut current, &mut items);
            current = value.map(|path| WorktreeItem {
                path: PathBuf::from(path),
                ..WorktreeItem::default()
            });
            continue;
        }
        let Some(item) = current.as_mut() else {
            log::trace!("worktree attribute outside a block: {line:?}");
            continue;
        };
        match key {
            "HEAD" => item.head = value.map(str::to_string),
            "branch" => {
                item.branch = value.map(|b| b.strip_prefix("refs/heads/").unwrap_or(b).to_string())
            }
            "bare" => item.is_bare = true,
            "detached" => item.is_detached = true,
            "locked" => {
                item.is_locked = true;
                item.locked_reason = value.map(str::to_string);
            }
            "prunable" => {
                item.is_prunable = true;
                item.prunable_reason = value.map(str::to_string);
            }
            _ => log::trace!("unknown worktree attribute {key:?}"),
        }
    }
    finish(&mut current, &mut items);
    items
}

#[derive(Debug, Clone, Default)]
struct BlameMeta {
    author: String,
    author_mail: String,
    author_time: Option<i64>,
    author_tz: Option<String>,
    summary: String,
}

impl BlameMeta {
    fn timestamp(&self) -> Timestamp {
        let utc = self
            .author_time
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
        match (utc, self.author_tz.as_deref().and_then(parse_tz_offset)) {
            (Some(utc), Some(offset)) => utc.with_timezone(&offset),
            (Some(utc), None) => utc.fixed_offset(),
            (None, _) => sentinel_date(),
        }
    }
}

/// `+0130` / `-0800` into a fixed offset
fn parse_tz_offset(tz: &str) -> Option<FixedOffset> {
    let (sign, digits) = match tz.as_bytes().first()? {
        b'+' => (1, &tz[1..]),
        b'-' => (-1, &tz[1..]),
        _ => return None,
    };
    if digits.len() != 4 {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Header line of a blame group: `<hash> <orig> <final> [<count>]`
fn parse_blame_header(line: &str) -> Option<(String, u32, u32)> {
    let mut parts = line.split(' ');
    let hash = parts.next()?;
    if !(hash.len() == 40 || hash.len() == 64) || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let original: u32 = parts.next()?.parse().ok()?;
    let final_line: u32 = parts.next()?.parse().ok()?;
    if let Some(count) = parts.next() {
        count.parse::<u32>().ok()?;
    }
    Some((hash.to_string(), original, final_line))
}

/// Parse `git blame --porcelain`.
///
/// Porcelain prints commit metadata only the first time a commit appears, so
/// metadata is cached by hash and reused for later groups.
pub fn parse_blame(output: &str) -> Vec<BlameEntry> {
    let mut entries = Vec::new();
    let mut metadata: HashMap<String, BlameMeta> = HashMap::new();
    let mut current: Option<(String, u32, u32)> = None;

    for line in output.lines() {
        if let Some(content) = line.strip_prefix('\t') {
            let Some((hash, original_line, final_line)) = current.take() else {
                log::trace!("blame content line without header");
                continue;
            };
            let meta = metadata.get(&hash).cloned().unwrap_or_default();
            entries.push(BlameEntry {
                author_time: meta.timestamp(),
                author: meta.author,
                author_mail: meta.author_mail,
                summary: meta.summary,
                hash,
                original_line,
                final_line,
                content: content.to_string(),
            });
            continue;
        }

        if current.is_none() {
            match parse_blame_header(line) {
                Some(header) => {
                    metadata.entry(header.0.clone()).or_default();
                    current = Some(header);
                }
                None => log::trace!("skipping unrecognised blame line {line:?}"),
            }
            continue;
        }

        let Some((hash, _, _)) = current.as_ref() else {
            continue;
        };
        let meta = metadata.entry(hash.clone()).or_default();
        let (key, value) = line.split_once(' ').unwrap_or((line, ""));
        match key {
            "author" => meta.author = value.to_string(),
            "author-mail" => {
                meta.author_mail = value.trim_start_matches('<').trim_end_matches('>').to_string()
            }
            "author-time" => meta.author_time = value.parse().ok(),
            "author-tz" => meta.author_tz = Some(value.to_string()),
            "summary" => meta.summary = value.to_string(),
            _ => {}
        }
    }
    entries
}

/// Parse `git status --porcelain=v1 -z`.
///
/// An entry with both an index and a worktree change yields two [`FileEntry`] values.
/// Unmerged pairs yield a single unstaged entry. The result is sorted by status
/// priority then path, and numbered from 1 in that order.
pub fn parse_status(output: &str) -> Vec<FileEntry> {
    let mut files = Vec::new();
    let mut fields = output.split('\0');

    while let Some(entry) = fields.next() {
        if entry.len() < 4 || !entry.is_char_boundary(3) {
            if !entry.is_empty() {
                log::trace!("skipping short status entry {entry:?}");
            }
            continue;
        }
        let mut codes = entry.chars();
        let (Some(x), Some(y)) = (codes.next(), codes.next()) else {
            continue;
        };
        let path = PathBuf::from(&entry[3..]);
        let original_path = if matches!(x, 'R' | 'C') {
            fields.next().map(PathBuf::from)
        } else {
            None
        };

        if x == '!' {
            continue;
        }
        if x == '?' {
            files.push(file_entry(GitStatus::Untracked, path, None, false));
            continue;
        }
        if GitStatus::is_unmerged_pair(x, y) {
            files.push(file_entry(GitStatus::Unmerged, path, None, false));
            continue;
        }
        if let Some(status) = GitStatus::from_code(x) {
            files.push(file_entry(status, path.clone(), original_path.clone(), true));
        }
        if let Some(status) = GitStatus::from_code(y) {
            files.push(file_entry(status, path, original_path, false));
        }
    }

    files.sort_by(|a, b| {
        a.status
            .sort_priority(a.staged)
            .cmp(&b.status.sort_priority(b.staged))
            .then_with(|| a.path.cmp(&b.path))
    });
    for (index, file) in files.iter_mut().enumerate() {
        file.index = index + 1;
    }
    files
}

fn file_entry(
    status: GitStatus,
    path: PathBuf,
    original_path: Option<PathBuf>,
    staged: bool,
) -> FileEntry {
    FileEntry {
        index: 0,
        status,
        path,
        original_path,
        staged,
    }
}

/// Parse `git remote -v`, one [`RemoteInfo`] per remote name in first-seen order
pub fn parse_remotes(output: &str) -> Vec<RemoteInfo> {
    let mut remotes: Vec<RemoteInfo> = Vec::new();
    for line in output.lines() {
        let mut parts = line.split_whitespace();
        let (Some(name), Some(url)) = (parts.next(), parts.next()) else {
            continue;
        };
        let kind = parts.next().unwrap_or("(fetch)");
        let index = match remotes.iter().position(|r| r.name == name) {
            Some(index) => index,
            None => {
                remotes.push(RemoteInfo {
                    name: name.to_string(),
                    fetch_url: None,
                    push_url: None,
                });
                remotes.len() - 1
            }
        };
        let remote = &mut remotes[index];
        match kind {
            "(push)" => remote.push_url = Some(url.to_string()),
            _ => remote.fetch_url = Some(url.to_string()),
        }
    }
    remotes
}

/// Parse `git submodule status`: `<state><hash> <path>[ (<describe>)]`
pub fn parse_submodules(output: &str) -> Vec<SubmoduleInfo> {
    output
        .lines()
        .filter_map(|line| {
            let mut chars = line.chars();
            let state = match chars.next()? {
                ' ' => SubmoduleState::UpToDate,
                '-' => SubmoduleState::Uninitialized,
                '+' => SubmoduleState::OutOfSync,
                'U' => SubmoduleState::Conflicted,
                _ => return None,
            };
            let rest = chars.as_str();
            let (hash, rest) = rest.split_once(' ')?;
            let (path, describe) = match rest.rsplit_once(" (") {
                Some((path, describe)) if describe.ends_with(')') => (
                    path,
                    Some(describe.trim_end_matches(')').to_string()),
                ),
                _ => (rest, None),
            };
            Some(SubmoduleInfo {
                path: PathBuf::from(path),
                hash: hash.to_string(),
                state,
                describe,
            })
        })
        .collect()
}
