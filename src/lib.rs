//! git-atlas - repository snapshots, commit graph layout and partial staging on top of the git CLI.
//!
//! Everything is derived from the textual output of the `git` executable: the library
//! never reads repository storage itself. Output is parsed into typed records, commits
//! are laid out into lanes and colors for drawing, and selected diff lines are turned
//! back into patches for `git apply --cached`.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module, which provides:
//! - Repository snapshots ([`SnapshotBuilder`], [`GitRepo::refresh`])
//! - Commit graph layout ([`layout_commits`])
//! - Branch hierarchy inference ([`BranchTreeBuilder`])
//! - Hunk parsing and patch construction ([`parse_diff_hunks`], [`build_lines_patch`])
//! - The [`CommandRunner`] boundary to the git executable
//! - Error handling and result types

pub mod commands;
pub mod core;

pub use core::{
    build_commits,
    build_hunks_patch,
    build_lines_patch,
    layout_commits,
    parse_diff_hunks,
    select_lines,
    // Data model
    BranchInfo,
    BranchTree,
    BranchTreeBuilder,
    BranchTreeNode,
    ColorKey,
    Commit,
    CommitGraphLayout,
    // Process boundary
    CommandOutput,
    CommandRunner,
    DiffHunk,
    DiffLine,
    // Error handling
    GitAtlasError,
    GitCli,
    GitEnvironment,
    // Repository operations
    GitRepo,
    GitStatus,
    LaneEdge,
    LineKind,
    LineSelection,
    ParsedCommit,
    PatchDirection,
    RepositorySnapshot,
    RequestGate,
    Result,
    SnapshotBuilder,
    StageOutcome,
};
