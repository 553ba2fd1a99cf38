use crate::commands::open_repository;
use crate::core::{config::ConfigOverrides, error::Result, state::short_hash};
use colored::*;

pub fn execute_blame(overrides: &ConfigOverrides, path: &str) -> Result<()> {
    let repo = open_repository(overrides)?;
    let entries = repo.blame(path)?;

    let author_width = entries
        .iter()
        .map(|e| e.author.chars().count())
        .max()
        .unwrap_or(0);
    let line_width = entries
        .iter()
        .map(|e| e.final_line)
        .max()
        .map_or(1, |max| max.to_string().len());

    for entry in &entries {
        println!(
            "{} {} {} {} {}",
            short_hash(&entry.hash).yellow(),
            format!("{:<author_width$}", entry.author).bright_black(),
            entry.author_time.format("%Y-%m-%d").to_string().bright_black(),
            format!("{:>line_width$}", entry.final_line).cyan(),
            entry.content
        );
    }
    Ok(())
}
