pub mod blame;
pub mod branches;
pub mod diff;
pub mod graph;
pub mod reflog;
pub mod show;
pub mod snapshot;
pub mod stage;
pub mod status;
pub mod worktrees;

pub use blame::*;
pub use branches::*;
pub use diff::*;
pub use graph::*;
pub use reflog::*;
pub use show::*;
pub use snapshot::*;
pub use stage::*;
pub use status::*;
pub use worktrees::*;

use crate::core::{
    config::{AtlasConfig, ConfigOverrides},
    error::Result,
    git::GitRepo,
};
use std::env;

/// Open the repository around the current directory with the user's configuration
pub fn open_repository(overrides: &ConfigOverrides) -> Result<GitRepo> {
    let config = AtlasConfig::load()?.with_overrides(overrides);
    let current_dir = env::current_dir()?;
    GitRepo::open_with_config(&current_dir, &config)
}
