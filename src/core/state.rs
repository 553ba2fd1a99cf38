//! Repository entities parsed from git output.
//!
//! Every record here is built wholesale by a parser in [`crate::core::records`] or
//! [`crate::core::porcelain`] and never mutated afterwards. A refresh replaces
//! them all at once.
//!
//! # Public API
//! - [`ParsedCommit`]: one commit from the log walk
//! - [`BranchInfo`], [`TagInfo`], [`StashEntry`]: refs
//! - [`WorktreeItem`], [`RemoteInfo`], [`SubmoduleInfo`]: repository surroundings
//! - [`ReflogEntry`], [`BlameEntry`]: history views
//! - [`FileEntry`]: one side (staged or unstaged) of an uncommitted change
//! - [`CommitDetail`], [`ChangedFile`]: the detail view of a single commit

use crate::core::git_status::GitStatus;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub type Timestamp = DateTime<FixedOffset>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCommit {
    pub hash: String,
    /// First parent is the primary ancestor
    pub parents: Vec<String>,
    pub author: String,
    pub date: Timestamp,
    pub subject: String,
    pub decorations: Vec<String>,
}

impl ParsedCommit {
    pub fn short_hash(&self) -> &str {
        short_hash(&self.hash)
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn is_head(&self) -> bool {
        self.decorations.iter().any(|d| d == "HEAD")
    }
}

/// First seven characters of a hash, or the whole string when shorter
pub fn short_hash(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}

/// A local or remote branch. Identity is `name`; `main` and `origin/main` are distinct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchInfo {
    pub name: String,
    pub full_ref: String,
    pub head: String,
    /// Short upstream name, `None` when the branch tracks nothing
    pub upstream: Option<String>,
    pub committer_date: Timestamp,
    pub is_remote: bool,
}

impl BranchInfo {
    /// Remote name for a `refs/remotes/<remote>/...` ref
    pub fn remote_name(&self) -> Option<&str> {
        self.full_ref
            .strip_prefix("refs/remotes/")
            .and_then(|rest| rest.split('/').next())
    }

    /// Branch name on its remote: `feature/x` for `refs/remotes/origin/feature/x`
    pub fn remote_short_name(&self) -> Option<&str> {
        self.full_ref
            .strip_prefix("refs/remotes/")
            .and_then(|rest| rest.split_once('/'))
            .map(|(_, short)| short)
    }

    /// The symbolic `refs/remotes/<remote>/HEAD` entry
    pub fn is_remote_head(&self) -> bool {
        self.is_remote && self.full_ref.ends_with("/HEAD")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagInfo {
    pub name: String,
    /// Commit the tag resolves to (peeled for annotated tags)
    pub target: String,
    pub annotated: bool,
    pub date: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StashEntry {
    pub index: usize,
    pub selector: String,
    pub hash: String,
    pub subject: String,
    pub date: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorktreeItem {
    pub path: PathBuf,
    pub head: Option<String>,
    /// Short branch name, `None` when detached or bare
    pub branch: Option<String>,
    pub is_main: bool,
    pub is_bare: bool,
    pub is_detached: bool,
    pub is_locked: bool,
    pub locked_reason: Option<String>,
    pub is_prunable: bool,
    pub prunable_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteInfo {
    pub name: String,
    pub fetch_url: Option<String>,
    pub push_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflogEntry {
    pub hash: String,
    pub selector: String,
    pub subject: String,
    pub date: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlameEntry {
    pub hash: String,
    pub original_line: u32,
    pub final_line: u32,
    pub author: String,
    pub author_mail: String,
    pub author_time: Timestamp,
    pub summary: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmoduleState {
    UpToDate,
    Uninitialized,
    OutOfSync,
    Conflicted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmoduleInfo {
    pub path: PathBuf,
    pub hash: String,
    pub state: SubmoduleState,
    pub describe: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    /// 1-based position in display order
    pub index: usize,
    pub status: GitStatus,
    pub path: PathBuf,
    /// Source path of a rename or copy
    pub original_path: Option<PathBuf>,
    pub staged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangedFile {
    pub status: GitStatus,
    pub path: PathBuf,
    pub original_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitDetail {
    pub hash: String,
    pub parents: Vec<String>,
    pub author_name: String,
    pub author_email: String,
    pub author_date: Timestamp,
    pub committer_name: String,
    pub committer_date: Timestamp,
    pub message: String,
    pub files: Vec<ChangedFile>,
}
