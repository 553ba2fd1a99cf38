use crate::commands::open_repository;
use crate::core::{
    colors::paint_diff_line,
    config::ConfigOverrides,
    error::Result,
    hunk::{DiffHunk, LineKind},
    output::print_info,
};
use colored::*;

/// Print the hunks of `path` with change lines numbered for `--lines`
pub fn execute_diff(overrides: &ConfigOverrides, path: &str, staged: bool) -> Result<()> {
    let repo = open_repository(overrides)?;
    let hunks = repo.file_diff(path, staged)?;

    if hunks.is_empty() {
        let side = if staged { "staged" } else { "unstaged" };
        print_info(&format!("No {side} changes in {path}"));
        return Ok(());
    }

    println!();
    for (number, hunk) in hunks.iter().enumerate() {
        print_hunk(number + 1, hunk);
    }
    Ok(())
}

fn print_hunk(number: usize, hunk: &DiffHunk) {
    println!(
        "{} {}",
        format!("Hunk {number}:").white().bold(),
        hunk.header.cyan()
    );
    let mut change_number = 0;
    for line in &hunk.lines {
        let label = if line.kind == LineKind::Context {
            "     ".to_string()
        } else {
            change_number += 1;
            format!("{:>5}", format!("[{change_number}]"))
        };
        let text = format!("{}{}", line.kind.prefix(), line.content);
        println!("{} {}", label.bright_black(), paint_diff_line(line.kind, &text));
        if line.missing_newline {
            println!("      {}", "\\ No newline at end of file".bright_black());
        }
    }
    println!();
}
