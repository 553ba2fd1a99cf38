//! User configuration read from `<config dir>/git-atlas/config.json`.
//!
//! Every field is optional in the file; missing fields take their defaults. The file is
//! only ever read: command-line flags override it for a single run via [`ConfigOverrides`].

use crate::core::branch_tree::{DEFAULT_MERGE_BASE_LIMIT, DEFAULT_ROOT_GROUP_THRESHOLD};
use crate::core::dirs::get_config_file;
use crate::core::error::{GitAtlasError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MAX_COMMITS: usize = 2000;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AtlasConfig {
    pub git_binary: String,
    pub max_commits: usize,
    pub infer_branch_parents: bool,
    pub merge_base_branch_limit: usize,
    pub root_group_threshold: usize,
    pub include_remote_commits: bool,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            git_binary: "git".to_string(),
            max_commits: DEFAULT_MAX_COMMITS,
            infer_branch_parents: true,
            merge_base_branch_limit: DEFAULT_MERGE_BASE_LIMIT,
            root_group_threshold: DEFAULT_ROOT_GROUP_THRESHOLD,
            include_remote_commits: true,
        }
    }
}

/// Per-run values taken from the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub max_commits: Option<usize>,
    pub no_infer: bool,
}

impl AtlasConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(GitAtlasError::config_read(path, e)),
        };
        let config: Self =
            serde_json::from_str(&content).map_err(|e| GitAtlasError::config_parse(path, e))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(max) = overrides.max_commits {
            self.max_commits = max;
        }
        if overrides.no_infer {
            self.infer_branch_parents = false;
        }
        self
    }
}
