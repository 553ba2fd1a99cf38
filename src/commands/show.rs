use crate::commands::open_repository;
use crate::core::{
    colors::get_colored_path,
    config::ConfigOverrides,
    error::{GitAtlasError, Result},
    state::short_hash,
};
use colored::*;

pub fn execute_show(overrides: &ConfigOverrides, hash: &str) -> Result<()> {
    let repo = open_repository(overrides)?;
    let detail = repo.commit_detail(hash)?.ok_or_else(|| {
        GitAtlasError::command_failed(
            format!("git show {hash}"),
            None,
            "no commit found",
            "",
        )
    })?;

    println!();
    println!("{} {}", "commit".yellow(), detail.hash.yellow());
    if detail.parents.len() > 1 {
        let parents: Vec<&str> = detail.parents.iter().map(|p| short_hash(p)).collect();
        println!("{} {}", "Merge:".bright_black(), parents.join(" "));
    }
    println!(
        "{} {} <{}>",
        "Author:".bright_black(),
        detail.author_name,
        detail.author_email
    );
    println!("{} {}", "Date:".bright_black(), detail.author_date.to_rfc2822());
    if detail.committer_name != detail.author_name {
        println!("{} {}", "Committer:".bright_black(), detail.committer_name);
    }
    println!();
    for line in detail.message.lines() {
        println!("    {line}");
    }

    if !detail.files.is_empty() {
        println!();
        for file in &detail.files {
            let path = match &file.original_path {
                Some(original) => format!("{} -> {}", original.display(), file.path.display()),
                None => file.path.display().to_string(),
            };
            println!(
                "  {} {}",
                get_colored_path(file.status, file.status.as_str()),
                get_colored_path(file.status, &path)
            );
        }
    }
    println!();
    Ok(())
}
