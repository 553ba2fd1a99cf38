//! Type-safe git file status enumeration.
//!
//! [`GitStatus`] is shared by the uncommitted-change list, the commit detail file list
//! and the status rendering. It is built from the single-letter codes git prints in
//! `status --porcelain` and `diff-tree --name-status` output.
//!
//! # Public API
//! - [`GitStatus`]: Main enumeration for all git file status types

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GitStatus {
    /// Modified file (M)
    Modified,
    /// Added/new file in index (A)
    Added,
    /// Deleted file (D)
    Deleted,
    /// Renamed file (R)
    Renamed,
    /// Copied file (C)
    Copied,
    /// Type changed (T)
    TypeChanged,
    /// Untracked file (??)
    Untracked,
    /// Unmerged/conflicted file (UU)
    Unmerged,
}

impl GitStatus {
    /// Map one column of a porcelain `XY` pair (or a name-status letter).
    ///
    /// Returns `None` for an unmodified column (space), ignored files and
    /// letters git does not document.
    pub fn from_code(code: char) -> Option<GitStatus> {
        match code {
            'M' => Some(GitStatus::Modified),
            'A' => Some(GitStatus::Added),
            'D' => Some(GitStatus::Deleted),
            'R' => Some(GitStatus::Renamed),
            'C' => Some(GitStatus::Copied),
            'T' => Some(GitStatus::TypeChanged),
            '?' => Some(GitStatus::Untracked),
            'U' => Some(GitStatus::Unmerged),
            _ => None,
        }
    }

    /// True for the `XY` combinations git uses for unmerged paths
    pub fn is_unmerged_pair(index: char, worktree: char) -> bool {
        matches!(
            (index, worktree),
            ('D', 'D') | ('A', 'U') | ('U', 'D') | ('U', 'A') | ('D', 'U') | ('A', 'A') | ('U', 'U')
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GitStatus::Modified => "M",
            GitStatus::Added => "A",
            GitStatus::Deleted => "D",
            GitStatus::Renamed => "R",
            GitStatus::Copied => "C",
            GitStatus::TypeChanged => "T",
            GitStatus::Untracked => "??",
            GitStatus::Unmerged => "UU",
        }
    }

    /// Get sort priority for status ordering
    pub fn sort_priority(&self, staged: bool) -> u8 {
        match (self, staged) {
            // Conflicts need attention first
            (GitStatus::Unmerged, _) => 0,
            (GitStatus::Added, true) => 1,
            (GitStatus::Modified, true) => 2,
            (GitStatus::Deleted, true) => 3,
            (GitStatus::Renamed, true) => 4,
            (GitStatus::Copied, true) => 5,
            (GitStatus::TypeChanged, true) => 6,
            (GitStatus::Modified, false) => 7,
            (GitStatus::Deleted, false) => 8,
            (GitStatus::Renamed, false) => 9,
            (GitStatus::Copied, false) => 10,
            (GitStatus::TypeChanged, false) => 11,
            (GitStatus::Untracked, _) => 12,
            _ => 13,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GitStatus::Modified => "modified",
            GitStatus::Added => "new",
            GitStatus::Deleted => "deleted",
            GitStatus::Renamed => "renamed",
            GitStatus::Copied => "copied",
            GitStatus::TypeChanged => "type changed",
            GitStatus::Untracked => "untracked",
            GitStatus::Unmerged => "both modified",
        }
    }

    /// Whether a textual diff can be staged line by line for this status
    pub fn supports_partial_staging(&self) -> bool {
        matches!(self, GitStatus::Modified | GitStatus::Added)
    }
}

impl fmt::Display for GitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(GitStatus::from_code('M'), Some(GitStatus::Modified));
        assert_eq!(GitStatus::from_code('A'), Some(GitStatus::Added));
        assert_eq!(GitStatus::from_code('R'), Some(GitStatus::Renamed));
        assert_eq!(GitStatus::from_code('?'), Some(GitStatus::Untracked));
        assert_eq!(GitStatus::from_code(' '), None);
        assert_eq!(GitStatus::from_code('!'), None);
    }

    #[test]
    fn test_unmerged_pairs() {
        assert!(GitStatus::is_unmerged_pair('U', 'U'));
        assert!(GitStatus::is_unmerged_pair('A', 'A'));
        assert!(GitStatus::is_unmerged_pair('D', 'D'));
        assert!(!GitStatus::is_unmerged_pair('M', 'M'));
        assert!(!GitStatus::is_unmerged_pair('A', 'M'));
    }

    #[test]
    fn test_git_status_display() {
        assert_eq!(format!("{}", GitStatus::Modified), "M");
        assert_eq!(format!("{}", GitStatus::Untracked), "??");
        assert_eq!(format!("{}", GitStatus::Unmerged), "UU");
    }

    #[test]
    fn test_sort_priority() {
        assert_eq!(GitStatus::Unmerged.sort_priority(false), 0);
        assert!(GitStatus::Added.sort_priority(true) < GitStatus::Modified.sort_priority(false));
        assert!(
            GitStatus::Untracked.sort_priority(false) > GitStatus::Modified.sort_priority(false)
        );
    }

    #[test]
    fn test_serializes_snake_case() -> serde_json::Result<()> {
        assert_eq!(
            serde_json::to_string(&GitStatus::TypeChanged)?,
            "\"type_changed\""
        );
        Ok(())
    }
}
