//! Consistent CLI message formatting shared by every command.
//!
//! Errors and warnings go to stderr, everything else to stdout. JSON output is
//! pretty-printed with `serde_json` and never decorated.

use crate::core::error::Result;
use colored::*;
use serde::Serialize;

/// Prints `✕ Error: <message>` in red, surrounded by blank lines
pub fn print_error(message: &str) {
    eprintln!("\n{} {}\n", "✕ Error:".red(), message.white());
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "!".yellow().bold(), message.yellow());
}

/// Prints `✓ <message>` with a green checkmark
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Prints `<header>:` followed by a blank line
pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.white());
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
