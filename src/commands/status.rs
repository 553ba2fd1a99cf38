use crate::commands::open_repository;
use crate::core::{
    colors::format_file_entry,
    config::ConfigOverrides,
    error::Result,
    git_status::GitStatus,
    state::{short_hash, FileEntry},
};
use colored::*;

pub fn execute_status(overrides: &ConfigOverrides) -> Result<()> {
    let repo = open_repository(overrides)?;

    let branch = repo
        .current_branch()?
        .unwrap_or_else(|| "HEAD (detached)".to_string());
    println!();
    println!("{} {}", "On branch:".bright_black(), branch.white().bold());
    match repo.head_commit()? {
        Some(head) => println!(
            "{} {} {}",
            "Head:".bright_black(),
            short_hash(&head.hash).yellow(),
            head.message.lines().next().unwrap_or_default()
        ),
        None => println!("{} {}", "Head:".bright_black(), "- no commits yet -".bright_black()),
    }

    let files = repo.status()?;
    if files.is_empty() {
        println!("\n{}", "Nothing to commit, working tree clean".bright_black());
        return Ok(());
    }
    print_grouped_status_sections(&files);
    Ok(())
}

fn print_grouped_status_sections(files: &[FileEntry]) {
    let mut conflicts = Vec::new();
    let mut staged = Vec::new();
    let mut unstaged = Vec::new();
    let mut untracked = Vec::new();

    for file in files {
        match file.status {
            GitStatus::Unmerged => conflicts.push(file),
            GitStatus::Untracked => untracked.push(file),
            _ if file.staged => staged.push(file),
            _ => unstaged.push(file),
        }
    }

    let sections = [
        ("Unmerged paths", conflicts),
        ("Changes to be committed", staged),
        ("Changes not staged for commit", unstaged),
        ("Untracked files", untracked),
    ];
    for (title, entries) in sections {
        if entries.is_empty() {
            continue;
        }
        println!("\n{}", format!("➤ {title}").white().bold());
        for entry in entries {
            println!("  {}", format_file_entry(entry));
        }
    }
    println!();
}
