//! Predicates for git-atlas command output.

#![allow(dead_code)]

use predicates::prelude::*;

pub fn not_in_git_repo() -> impl Predicate<str> {
    predicates::str::contains("Not in a git repository")
}

pub fn has_branch_info(branch: &str) -> impl Predicate<str> {
    predicates::str::contains("On branch:").and(predicates::str::contains(branch.to_string()))
}

pub fn has_head_info() -> impl Predicate<str> {
    predicates::str::contains("Head:")
}

pub fn has_file_index(index: u32) -> impl Predicate<str> {
    predicates::str::contains(format!("[{index}]"))
}

pub fn has_section(title: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("➤ {title}"))
}
