use crate::commands::open_repository;
use crate::core::{
    config::ConfigOverrides,
    error::Result,
    output::print_info,
    state::short_hash,
};
use colored::*;

pub fn execute_reflog(overrides: &ConfigOverrides, limit: usize) -> Result<()> {
    let repo = open_repository(overrides)?;
    let entries = repo.reflog(limit)?;
    if entries.is_empty() {
        print_info("No reflog entries yet.");
        return Ok(());
    }

    println!();
    for entry in &entries {
        println!(
            "{} {} {} {}",
            short_hash(&entry.hash).yellow(),
            entry.selector.cyan(),
            entry.subject,
            entry.date.format("(%Y-%m-%d %H:%M)").to_string().bright_black()
        );
    }
    println!();
    Ok(())
}
