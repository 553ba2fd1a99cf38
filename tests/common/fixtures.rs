//! Prepared repository scenarios shared by several test files.

#![allow(dead_code)]

use super::repository::*;
use git_atlas::core::error::Result;

/// Twenty lines `line 1` to `line 20`, the baseline for hunk and line staging tests
pub fn numbered_lines() -> String {
    (1..=20).map(|n| format!("line {n}\n")).collect()
}

/// `numbers.txt` committed, then edited in two far-apart places so the diff has
/// two hunks: `line 2` becomes `LINE 2`, and `line 18.5` is inserted after `line 18`.
pub fn create_two_hunk_repo() -> Result<TestRepo> {
    let repo = setup_test_repo()?;
    repo.commit_file("numbers.txt", &numbered_lines(), "Add numbers")?;

    let edited: String = (1..=20)
        .map(|n| match n {
            2 => "LINE 2\n".to_string(),
            18 => "line 18\nline 18.5\n".to_string(),
            _ => format!("line {n}\n"),
        })
        .collect();
    repo.write("numbers.txt", &edited)?;
    Ok(repo)
}

/// `main` with two commits, `develop` branched from it, and `feature/login` off
/// `develop` with one commit of its own merged back into `main` with `--no-ff`.
pub fn create_merge_repo() -> Result<TestRepo> {
    let repo = setup_test_repo()?;
    repo.commit_file("a.txt", "a\n", "First")?;
    repo.commit_file("b.txt", "b\n", "Second")?;
    repo.git(&["branch", "develop"])?;
    repo.git(&["checkout", "-q", "-b", "feature/login"])?;
    repo.commit_file("login.txt", "login\n", "Add login")?;
    repo.git(&["checkout", "-q", "main"])?;
    repo.commit_file("c.txt", "c\n", "Third")?;
    repo.git(&["merge", "-q", "--no-ff", "-m", "Merge feature/login", "feature/login"])?;
    Ok(repo)
}
