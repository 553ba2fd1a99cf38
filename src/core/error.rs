//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`GitAtlasError`] which covers every failure that can
//! propagate out of git-atlas. It uses `thiserror` for ergonomic error definitions
//! and includes constructor helpers for the common failure scenarios.
//!
//! # Public API
//! - [`GitAtlasError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, GitAtlasError>`
//!
//! # Error Categories
//! - **Process failures**: the external git command exited non-zero
//! - **Repository state**: not a repository, nothing to stage
//! - **Selection input**: invalid hunk or line selections from the CLI
//! - **Configuration**: unreadable or malformed config file
//!
//! Malformed records in git output and empty patch selections are *not* errors;
//! parsers drop what they cannot read and patch builders return `None`.

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for git-atlas
#[derive(Error, Debug)]
pub enum GitAtlasError {
    // Repository errors
    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("git executable '{binary}' could not be started: {source}")]
    GitNotAvailable {
        binary: String,
        source: std::io::Error,
    },

    #[error("`{command}` failed{}: {message}", .status.map(|s| format!(" (exit {s})")).unwrap_or_default())]
    CommandFailed {
        command: String,
        status: Option<i32>,
        message: String,
    },

    // I/O and encoding errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid UTF-8 in git output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Staging errors
    #[error("No changes found in {path}")]
    NoChanges { path: String },

    #[error("Hunk {index} is out of range (1-{max} available)")]
    HunkOutOfRange { index: usize, max: usize },

    // Line selection errors
    #[error("Invalid range format: '{range}'. Use format like '3-6'")]
    InvalidRangeFormat { range: String },

    #[error("Invalid number in range: '{number}'")]
    InvalidRangeNumber { number: String },

    #[error("Invalid range: start ({start}) must be <= end ({end})")]
    InvalidRangeOrder { start: usize, end: usize },

    #[error("Invalid number: '{number}'")]
    InvalidNumber { number: String },

    #[error("Line index must be positive (got 0)")]
    ZeroIndex,

    #[error("Line {index} is out of range (1-{max} changed lines in hunk)")]
    LineOutOfRange { index: usize, max: usize },

    // Configuration errors
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using GitAtlasError
pub type Result<T> = std::result::Result<T, GitAtlasError>;

impl GitAtlasError {
    /// Create a command failure from the attempted command line and its output.
    ///
    /// The message is the trimmed stderr, or the trimmed stdout when stderr is empty.
    pub fn command_failed(
        command: impl Into<String>,
        status: Option<i32>,
        stderr: &str,
        stdout: &str,
    ) -> Self {
        let stderr = stderr.trim();
        let message = if stderr.is_empty() {
            match stdout.trim() {
                "" => "command failed with no output".to_string(),
                out => out.to_string(),
            }
        } else {
            stderr.to_string()
        };
        Self::CommandFailed {
            command: command.into(),
            status,
            message,
        }
    }

    /// Create a git-not-available error
    pub fn git_not_available(binary: impl Into<String>, source: std::io::Error) -> Self {
        Self::GitNotAvailable {
            binary: binary.into(),
            source,
        }
    }

    /// Create a no changes error
    pub fn no_changes(path: impl Into<String>) -> Self {
        Self::NoChanges { path: path.into() }
    }

    /// Create a hunk out of range error
    pub fn hunk_out_of_range(index: usize, max: usize) -> Self {
        Self::HunkOutOfRange { index, max }
    }

    /// Create a line out of range error
    pub fn line_out_of_range(index: usize, max: usize) -> Self {
        Self::LineOutOfRange { index, max }
    }

    /// Create an invalid range format error
    pub fn invalid_range_format(range: impl Into<String>) -> Self {
        Self::InvalidRangeFormat {
            range: range.into(),
        }
    }

    /// Create an invalid range number error
    pub fn invalid_range_number(number: impl Into<String>) -> Self {
        Self::InvalidRangeNumber {
            number: number.into(),
        }
    }

    /// Create an invalid range order error
    pub fn invalid_range_order(start: usize, end: usize) -> Self {
        Self::InvalidRangeOrder { start, end }
    }

    /// Create an invalid number error
    pub fn invalid_number(number: impl Into<String>) -> Self {
        Self::InvalidNumber {
            number: number.into(),
        }
    }

    /// Create a config read error
    pub fn config_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigRead {
            path: path.into(),
            source,
        }
    }

    /// Create a config parse error
    pub fn config_parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::ConfigParse {
            path: path.into(),
            source,
        }
    }

    /// True when the failure came from the external command rather than from us
    pub fn is_command_failure(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }
}
