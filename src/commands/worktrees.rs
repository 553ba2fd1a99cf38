use crate::commands::open_repository;
use crate::core::{
    config::ConfigOverrides,
    error::Result,
    output::print_section_header,
    state::{short_hash, WorktreeItem},
};
use colored::*;

pub fn execute_worktrees(overrides: &ConfigOverrides) -> Result<()> {
    let repo = open_repository(overrides)?;
    let worktrees = repo.worktrees()?;

    print_section_header("Worktrees");
    for worktree in &worktrees {
        println!("{}", describe(worktree));
    }
    println!();
    Ok(())
}

fn describe(worktree: &WorktreeItem) -> String {
    let target = match (&worktree.branch, &worktree.head) {
        _ if worktree.is_bare => "(bare)".bright_black().to_string(),
        (Some(branch), _) => branch.blue().to_string(),
        (None, Some(head)) => format!("(detached at {})", short_hash(head)).yellow().to_string(),
        (None, None) => "(unknown)".bright_black().to_string(),
    };

    let mut flags = Vec::new();
    if worktree.is_main {
        flags.push("main".to_string());
    }
    if worktree.is_locked {
        flags.push(match &worktree.locked_reason {
            Some(reason) => format!("locked: {reason}"),
            None => "locked".to_string(),
        });
    }
    if worktree.is_prunable {
        flags.push(match &worktree.prunable_reason {
            Some(reason) => format!("prunable: {reason}"),
            None => "prunable".to_string(),
        });
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" {}", format!("[{}]", flags.join(", ")).bright_black())
    };

    format!("{} {target}{flags}", worktree.path.display())
}
