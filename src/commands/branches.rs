use crate::commands::open_repository;
use crate::core::{
    branch_tree::{BranchTree, BranchTreeNode},
    config::ConfigOverrides,
    error::Result,
    output::{print_info, print_json, print_section_header},
    state::short_hash,
};
use colored::*;

pub fn execute_branches(overrides: &ConfigOverrides, json: bool) -> Result<()> {
    let repo = open_repository(overrides)?;
    let branches = repo.branches()?;
    let tree = repo.branch_tree(&branches);

    if json {
        return print_json(&tree);
    }
    if branches.is_empty() {
        print_info("No branches found. Make your first commit to create one.");
        return Ok(());
    }

    let current = repo.current_branch()?;
    print_group(&tree.local, &tree, current.as_deref());
    if !tree.remote.children().is_empty() {
        print_group(&tree.remote, &tree, None);
    }
    println!();
    Ok(())
}

fn print_group(group: &BranchTreeNode, tree: &BranchTree, current: Option<&str>) {
    print_section_header(group.label());
    for (depth, node) in group.flatten().into_iter().skip(1) {
        let indent = "  ".repeat(depth - 1);
        match node {
            BranchTreeNode::Group { label, .. } => {
                println!("{indent}{}", format!("{label}/").bright_black());
            }
            BranchTreeNode::Branch { name, .. } => {
                let marker = if current == Some(name.as_str()) {
                    format!("{}{}{}", "[".bright_black(), "*".white(), "]".bright_black())
                } else {
                    "   ".to_string()
                };
                let base = tree
                    .merge_bases
                    .get(name)
                    .map(|base| format!(" {}", format!("(base {})", short_hash(base)).bright_black()))
                    .unwrap_or_default();
                println!("{indent}{marker} {}{base}", name.blue());
            }
        }
    }
}
