//! Text rendering of the laid-out commit graph.
//!
//! One row per commit, plus a connector row underneath whenever the commit has
//! diagonal edges to its parents.

use crate::commands::open_repository;
use crate::core::{
    colors::paint_lane,
    config::ConfigOverrides,
    error::Result,
    graph::{ColorKey, Commit, CommitGraphLayout},
    output::print_json,
};
use colored::*;
use std::collections::BTreeSet;

pub fn execute_graph(overrides: &ConfigOverrides, json: bool) -> Result<()> {
    let repo = open_repository(overrides)?;
    let snapshot = repo.snapshot()?;

    if json {
        return print_json(&snapshot.commits);
    }
    if snapshot.commits.is_empty() {
        println!("\n{}\n", "- no commits yet -".bright_black());
        return Ok(());
    }

    let width = snapshot
        .commits
        .iter()
        .map(|c| c.layout.width())
        .max()
        .unwrap_or(1);
    for commit in &snapshot.commits {
        println!("{}  {}", render_node_row(&commit.layout, width), describe(commit));
        if let Some(connector) = render_connector_row(&commit.layout, width) {
            println!("{connector}");
        }
    }
    Ok(())
}

fn describe(commit: &Commit) -> String {
    let parsed = &commit.parsed;
    let decorations = if parsed.decorations.is_empty() {
        String::new()
    } else {
        format!("({}) ", parsed.decorations.join(", "))
    };
    format!(
        "{} {}{} {}",
        parsed.short_hash().yellow(),
        decorations.green(),
        parsed.subject,
        parsed.author.bright_black()
    )
}

fn lane_color(layout: &CommitGraphLayout, lane: usize) -> ColorKey {
    layout
        .lane_colors
        .get(&lane)
        .copied()
        .unwrap_or(layout.node_color)
}

/// The row holding the commit's node
pub fn render_node_row(layout: &CommitGraphLayout, width: usize) -> String {
    let active: BTreeSet<usize> = layout
        .incoming_lanes
        .iter()
        .chain(&layout.outgoing_lanes)
        .copied()
        .collect();
    let node = if layout.outgoing_edges.len() > 1 { "◆" } else { "●" };

    let mut row = String::new();
    for lane in 0..width.max(layout.width()) {
        if lane > 0 {
            row.push(' ');
        }
        if lane == layout.lane {
            row.push_str(&paint_lane(node, layout.node_color).to_string());
        } else if active.contains(&lane) {
            row.push_str(&paint_lane("│", lane_color(layout, lane)).to_string());
        } else {
            row.push(' ');
        }
    }
    row
}

/// Diagonal connectors to parents in other lanes, or `None` when every edge is straight
pub fn render_connector_row(layout: &CommitGraphLayout, width: usize) -> Option<String> {
    let diagonals: Vec<_> = layout
        .outgoing_edges
        .iter()
        .filter(|edge| !edge.is_straight())
        .collect();
    if diagonals.is_empty() {
        return None;
    }

    let columns = width.max(layout.width());
    let mut cells: Vec<Option<(char, ColorKey)>> = vec![None; columns];
    let mut gaps: Vec<Option<ColorKey>> = vec![None; columns.saturating_sub(1)];
    for &lane in &layout.outgoing_lanes {
        cells[lane] = Some(('│', lane_color(layout, lane)));
    }

    for edge in diagonals {
        let (low, high) = (edge.from.min(edge.to), edge.from.max(edge.to));
        for gap in &mut gaps[low..high] {
            *gap = Some(edge.color);
        }
        for cell in &mut cells[low + 1..high] {
            let crossing = match *cell {
                Some(('│', color)) => ('┼', color),
                _ => ('─', edge.color),
            };
            *cell = Some(crossing);
        }
        let rightward = edge.to > edge.from;
        cells[edge.to] = Some((if rightward { '╮' } else { '╭' }, edge.color));
        let continues = matches!(cells[edge.from], Some(('│' | '├' | '┤', _)));
        let origin = match (continues, rightward) {
            (true, true) => '├',
            (true, false) => '┤',
            (false, true) => '╰',
            (false, false) => '╯',
        };
        cells[edge.from] = Some((origin, layout.node_color));
    }

    let mut row = String::new();
    for (lane, cell) in cells.iter().enumerate() {
        if lane > 0 {
            match gaps[lane - 1] {
                Some(color) => row.push_str(&paint_lane("─", color).to_string()),
                None => row.push(' '),
            }
        }
        match cell {
            Some((symbol, color)) => row.push_str(&paint_lane(&symbol.to_string(), *color).to_string()),
            None => row.push(' '),
        }
    }
    Some(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::layout_commits;
    use crate::core::state::ParsedCommit;
    use chrono::DateTime;
    use std::collections::HashSet;

    fn commit(hash: &str, parents: &[&str]) -> ParsedCommit {
        ParsedCommit {
            hash: hash.to_string(),
            parents: parents.iter().map(|p| p.to_string()).collect(),
            author: "Ada".to_string(),
            date: DateTime::UNIX_EPOCH.fixed_offset(),
            subject: hash.to_string(),
            decorations: Vec::new(),
        }
    }

    #[test]
    fn test_linear_history_has_no_connectors() {
        let layouts = layout_commits(
            &[commit("c", &["b"]), commit("b", &["a"]), commit("a", &[])],
            &HashSet::new(),
        );
        for layout in &layouts {
            assert!(render_connector_row(layout, 1).is_none());
        }
    }

    #[test]
    fn test_merge_draws_branch_out_connector() {
        colored::control::set_override(false);
        let main_chain: HashSet<String> = ["m", "b"].iter().map(|h| h.to_string()).collect();
        let layouts = layout_commits(
            &[commit("m", &["b", "f"]), commit("f", &["b"]), commit("b", &[])],
            &main_chain,
        );
        assert!(render_node_row(&layouts[0], 2).starts_with('◆'));
        let connector = render_connector_row(&layouts[0], 2).expect("merge has a diagonal");
        assert_eq!(connector, "├─╮");
    }
}
