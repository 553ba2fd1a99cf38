use crate::commands::open_repository;
use crate::core::{config::ConfigOverrides, error::Result, output::print_json};

/// Dump a full repository snapshot as JSON
pub fn execute_snapshot(overrides: &ConfigOverrides) -> Result<()> {
    let repo = open_repository(overrides)?;
    match repo.refresh()? {
        Some(snapshot) => print_json(snapshot.as_ref()),
        None => Ok(()),
    }
}
