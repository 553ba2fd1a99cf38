//! Core functionality for git-atlas.
//!
//! Parsers, the graph and patch engines, the snapshot builder and the git
//! process boundary, plus the error, config and output plumbing they share.

pub mod branch_tree;
pub mod colors;
pub mod config;
pub mod dirs;
pub mod error;
pub mod git;
pub mod git_status;
pub mod graph;
pub mod hunk;
pub mod line_selection;
pub mod output;
pub mod patch;
pub mod porcelain;
pub mod records;
pub mod refresh;
pub mod runner;
pub mod snapshot;
pub mod state;

// === Error handling ===
pub use error::{GitAtlasError, Result};

// === Process boundary ===
pub use runner::{CommandOutput, CommandRunner, GitCli, GitEnvironment};

// === Repository façade ===
pub use git::{GitRepo, StageOutcome};

// === Engines ===
// Lane layout for the commit graph and hunk/patch construction for partial staging
pub use branch_tree::{BranchTree, BranchTreeBuilder, BranchTreeNode};
pub use graph::{build_commits, layout_commits, ColorKey, Commit, CommitGraphLayout, LaneEdge};
pub use hunk::{build_hunks_patch, parse_diff_hunks, DiffHunk, DiffLine, LineKind};
pub use patch::{build_lines_patch, select_lines, PatchDirection};

// === Snapshots ===
pub use refresh::{RequestGate, RequestToken};
pub use snapshot::{RepositorySnapshot, SnapshotBuilder, SnapshotOptions};

// === Data model ===
pub use git_status::GitStatus;
pub use state::{
    BlameEntry, BranchInfo, ChangedFile, CommitDetail, FileEntry, ParsedCommit, ReflogEntry,
    RemoteInfo, StashEntry, SubmoduleInfo, TagInfo, WorktreeItem,
};

// === User input ===
// Parser for line selections like "1 3-5,8" inside a hunk
pub use line_selection::LineSelection;

pub use config::{AtlasConfig, ConfigOverrides};
pub use output::{print_error, print_info, print_json, print_section_header, print_success};
