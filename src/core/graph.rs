//! Commit-graph lane and colour layout.
//!
//! [`layout_commits`] takes commits in topological order (children before parents)
//! and assigns every commit a lane (column) and a colour key in one left-to-right
//! pass. Alongside the node position it records which lanes carry a vertical line
//! above and below the row and the edges from the node to each parent, which is
//! everything a renderer needs to draw the graph.
//!
//! # Layout rules
//! - A commit reserved earlier as someone's parent reuses that reservation's lane.
//!   Otherwise main-chain commits prefer lane 0 and others lane 1, searching outward
//!   (+1, -1, +2, -2, ...) for a free lane.
//! - The first parent continues on the commit's own lane with the commit's colour,
//!   so linear history draws as a straight line. Further parents prefer `lane + 1`.
//! - A parent that is already reserved keeps its lane and colour. A main-chain parent
//!   moves to lane 0 when lane 0 is free; when it is occupied nothing moves.
//! - Colour priority: memoised colour for the hash, then the colour the lane was
//!   holding, then the caller's preferred colour, then a fresh key.
//! - When a main chain is given, colour 0 belongs to it and fresh keys start at 1.
//!
//! The lane table is local to one call, so layouts never share state.

use crate::core::state::ParsedCommit;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Opaque colour bucket shared by all commits on one line of descent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorKey(pub u32);

impl ColorKey {
    /// Colour of the main chain when one is supplied
    pub const MAIN: ColorKey = ColorKey(0);
}

/// Connector from a commit's lane to one of its parents' lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneEdge {
    pub from: usize,
    pub to: usize,
    pub color: ColorKey,
}

impl LaneEdge {
    pub fn is_straight(&self) -> bool {
        self.from == self.to
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitGraphLayout {
    pub lane: usize,
    pub node_color: ColorKey,
    /// Lanes with a vertical line entering this row from above
    pub incoming_lanes: Vec<usize>,
    /// Lanes with a vertical line leaving this row downwards
    pub outgoing_lanes: Vec<usize>,
    pub lane_colors: BTreeMap<usize, ColorKey>,
    pub outgoing_edges: Vec<LaneEdge>,
}

impl CommitGraphLayout {
    /// Number of columns this row touches
    pub fn width(&self) -> usize {
        self.incoming_lanes
            .iter()
            .chain(&self.outgoing_lanes)
            .chain(self.outgoing_edges.iter().map(|e| &e.to))
            .copied()
            .chain(std::iter::once(self.lane))
            .max()
            .map_or(0, |max| max + 1)
    }
}

/// A parsed commit together with its layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    #[serde(flatten)]
    pub parsed: ParsedCommit,
    pub layout: CommitGraphLayout,
}

#[derive(Debug, Clone)]
struct Lane {
    hash: String,
    color: ColorKey,
}

/// Mutable state of a single layout pass
struct LaneTable<'a> {
    lanes: Vec<Option<Lane>>,
    colors: HashMap<String, ColorKey>,
    next_color: u32,
    main_chain: &'a HashSet<String>,
}

impl<'a> LaneTable<'a> {
    fn new(main_chain: &'a HashSet<String>) -> Self {
        let colors = main_chain
            .iter()
            .map(|hash| (hash.clone(), ColorKey::MAIN))
            .collect();
        Self {
            lanes: Vec::new(),
            colors,
            next_color: if main_chain.is_empty() { 0 } else { 1 },
            main_chain,
        }
    }

    fn mint(&mut self) -> ColorKey {
        let color = ColorKey(self.next_color);
        self.next_color += 1;
        color
    }

    fn is_free(&self, lane: usize) -> bool {
        self.lanes.get(lane).map_or(true, Option::is_none)
    }

    fn lane_of(&self, hash: &str) -> Option<usize> {
        self.lanes
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|l| l.hash == hash))
    }

    fn occupied(&self) -> impl Iterator<Item = (usize, &Lane)> + '_ {
        self.lanes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|lane| (i, lane)))
    }

    /// Lowest lane `hash` may occupy: lane 0 belongs to the main chain when there is one
    fn floor_for(&self, hash: &str) -> usize {
        usize::from(!self.main_chain.is_empty() && !self.main_chain.contains(hash))
    }

    /// First free lane scanning outward from `preferred`, +d before -d, never below `floor`
    fn find_free_lane(&self, preferred: usize, floor: usize) -> usize {
        let preferred = preferred.max(floor);
        if self.is_free(preferred) {
            return preferred;
        }
        let window = self.lanes.len() + preferred + 1;
        for distance in 1..=window {
            if self.is_free(preferred + distance) {
                return preferred + distance;
            }
            if distance <= preferred - floor && self.is_free(preferred - distance) {
                return preferred - distance;
            }
        }
        self.lanes.len().max(preferred + 1)
    }

    fn occupy(&mut self, index: usize, lane: Lane) {
        if index >= self.lanes.len() {
            self.lanes.resize(index + 1, None);
        }
        self.lanes[index] = Some(lane);
    }

    fn trim(&mut self) {
        while matches!(self.lanes.last(), Some(None)) {
            self.lanes.pop();
        }
    }

    /// Reserve a lane for `parent`, returning the lane and the colour the edge carries
    fn reserve_parent(
        &mut self,
        parent: &str,
        preferred_lane: usize,
        preferred_color: Option<ColorKey>,
    ) -> (usize, ColorKey) {
        if let Some(existing) = self
            .occupied()
            .find(|(_, lane)| lane.hash == parent)
            .map(|(index, lane)| (index, lane.color))
        {
            return existing;
        }

        let mut target = self.find_free_lane(preferred_lane, self.floor_for(parent));
        if self.main_chain.contains(parent) && target != 0 && self.is_free(0) {
            target = 0;
        }

        let color = match self.colors.get(parent).copied().or(preferred_color) {
            Some(color) => color,
            None => self.mint(),
        };
        self.colors.insert(parent.to_string(), color);
        self.occupy(
            target,
            Lane {
                hash: parent.to_string(),
                color,
            },
        );
        (target, color)
    }

    fn place(&mut self, commit: &ParsedCommit) -> CommitGraphLayout {
        let mut lane_colors: BTreeMap<usize, ColorKey> = BTreeMap::new();
        let incoming_lanes: Vec<usize> = self
            .occupied()
            .map(|(index, lane)| {
                lane_colors.insert(index, lane.color);
                index
            })
            .collect();
        let incoming_set: BTreeSet<usize> = incoming_lanes.iter().copied().collect();

        let is_main = self.main_chain.contains(&commit.hash);
        let reserved = self.lane_of(&commit.hash);
        let lane = match reserved {
            Some(index) => index,
            None => {
                let preferred = if is_main { 0 } else { 1 };
                self.find_free_lane(preferred, self.floor_for(&commit.hash))
            }
        };
        let held_color = reserved
            .and_then(|index| self.lanes[index].take())
            .map(|slot| slot.color);

        let node_color = match self.colors.get(&commit.hash).copied().or(held_color) {
            Some(color) => color,
            None => self.mint(),
        };
        self.colors.insert(commit.hash.clone(), node_color);
        lane_colors.insert(lane, node_color);

        let mut outgoing_edges = Vec::with_capacity(commit.parents.len());
        for (position, parent) in commit.parents.iter().enumerate() {
            let (preferred_lane, preferred_color) = if position == 0 {
                (lane, Some(node_color))
            } else {
                (lane + 1, None)
            };
            let (to, color) = self.reserve_parent(parent, preferred_lane, preferred_color);
            outgoing_edges.push(LaneEdge {
                from: lane,
                to,
                color,
            });
        }

        self.trim();

        let started_by_diagonal: BTreeSet<usize> = outgoing_edges
            .iter()
            .filter(|edge| !edge.is_straight() && !incoming_set.contains(&edge.to))
            .map(|edge| edge.to)
            .collect();
        let outgoing_lanes: Vec<usize> = self
            .occupied()
            .filter(|(index, _)| !started_by_diagonal.contains(index))
            .map(|(index, lane)| {
                lane_colors.insert(index, lane.color);
                index
            })
            .collect();

        CommitGraphLayout {
            lane,
            node_color,
            incoming_lanes,
            outgoing_lanes,
            lane_colors,
            outgoing_edges,
        }
    }
}

/// Lay out `commits`, returning one layout per commit in input order.
///
/// `main_chain` holds the first-parent ancestry of HEAD; pass an empty set to lay
/// out without an anchored trunk.
pub fn layout_commits(
    commits: &[ParsedCommit],
    main_chain: &HashSet<String>,
) -> Vec<CommitGraphLayout> {
    let mut table = LaneTable::new(main_chain);
    let layouts: Vec<CommitGraphLayout> = commits.iter().map(|c| table.place(c)).collect();
    log::debug!(
        "laid out {} commits across {} lanes",
        layouts.len(),
        layouts.iter().map(CommitGraphLayout::width).max().unwrap_or(0)
    );
    layouts
}

/// Lay out and pair each commit with its layout
pub fn build_commits(commits: Vec<ParsedCommit>, main_chain: &HashSet<String>) -> Vec<Commit> {
    let layouts = layout_commits(&commits, main_chain);
    commits
        .into_iter()
        .zip(layouts)
        .map(|(parsed, layout)| Commit { parsed, layout })
        .collect()
}
