//! Parent/child hierarchy of local branches and grouping of remote branches.
//!
//! Git has no notion of a branch's parent, so [`BranchTreeBuilder`] infers one: the
//! upstream when it names another local branch, otherwise a guess from naming
//! conventions (`feature/*` hangs off `develop`, `hotfix/*` off `main`, ...).
//! The result is a display structure only; nothing here owns or mutates branches.
//!
//! # Public API
//! - [`BranchTreeBuilder`]: configurable builder (`with_*` options)
//! - [`BranchTree`]: the "Local branches" and "Remote branches" groups plus the
//!   inferred parents and optional merge bases
//! - [`BranchTreeNode`]: a branch with nested children, or a labelled group

use crate::core::state::BranchInfo;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Conventional long-lived branch names, in display order
pub const TRUNK_NAMES: [&str; 6] = ["main", "master", "develop", "dev", "trunk", "production"];

pub const DEFAULT_MERGE_BASE_LIMIT: usize = 48;
pub const DEFAULT_ROOT_GROUP_THRESHOLD: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BranchTreeNode {
    Branch {
        name: String,
        children: Vec<BranchTreeNode>,
    },
    Group {
        label: String,
        children: Vec<BranchTreeNode>,
    },
}

impl BranchTreeNode {
    pub fn children(&self) -> &[BranchTreeNode] {
        match self {
            BranchTreeNode::Branch { children, .. } | BranchTreeNode::Group { children, .. } => {
                children
            }
        }
    }

    /// Branch name, or the group label
    pub fn label(&self) -> &str {
        match self {
            BranchTreeNode::Branch { name, .. } => name,
            BranchTreeNode::Group { label, .. } => label,
        }
    }

    /// Depth-first listing with depth, starting at this node with depth 0
    pub fn flatten(&self) -> Vec<(usize, &BranchTreeNode)> {
        let mut out = Vec::new();
        let mut stack = vec![(0, self)];
        while let Some((depth, node)) = stack.pop() {
            out.push((depth, node));
            for child in node.children().iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        out
    }

    /// Find the node for a branch name anywhere below this node
    pub fn find_branch(&self, branch: &str) -> Option<&BranchTreeNode> {
        self.flatten().into_iter().map(|(_, node)| node).find(
            |node| matches!(node, BranchTreeNode::Branch { name, .. } if name == branch),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchTree {
    pub local: BranchTreeNode,
    pub remote: BranchTreeNode,
    /// Resolved parent for every local branch that has one
    pub parents: BTreeMap<String, String>,
    /// Merge base of each branch with its parent, when computed
    pub merge_bases: BTreeMap<String, String>,
}

pub struct BranchTreeBuilder<'a> {
    branches: &'a [BranchInfo],
    infer_parents: bool,
    merge_base_limit: usize,
    root_group_threshold: usize,
}

impl<'a> BranchTreeBuilder<'a> {
    pub fn new(branches: &'a [BranchInfo]) -> Self {
        Self {
            branches,
            infer_parents: true,
            merge_base_limit: DEFAULT_MERGE_BASE_LIMIT,
            root_group_threshold: DEFAULT_ROOT_GROUP_THRESHOLD,
        }
    }

    pub fn with_inference(mut self, enabled: bool) -> Self {
        self.infer_parents = enabled;
        self
    }

    pub fn with_merge_base_limit(mut self, limit: usize) -> Self {
        self.merge_base_limit = limit;
        self
    }

    pub fn with_root_group_threshold(mut self, threshold: usize) -> Self {
        self.root_group_threshold = threshold;
        self
    }

    pub fn build(&self) -> BranchTree {
        self.build_with_merge_bases(|_, _| None)
    }

    /// Build the tree, asking `merge_base(branch, parent)` for each parented branch
    /// when inference is on and there are few enough local branches.
    pub fn build_with_merge_bases<F>(&self, mut merge_base: F) -> BranchTree
    where
        F: FnMut(&str, &str) -> Option<String>,
    {
        let locals: Vec<&BranchInfo> = self.branches.iter().filter(|b| !b.is_remote).collect();
        let names: HashSet<&str> = locals.iter().map(|b| b.name.as_str()).collect();

        let mut parents = BTreeMap::new();
        for branch in &locals {
            if let Some(parent) = self.resolve_parent(branch, &names) {
                parents.insert(branch.name.clone(), parent);
            }
        }
        break_cycles(&mut parents);

        let mut merge_bases = BTreeMap::new();
        if self.infer_parents && locals.len() <= self.merge_base_limit {
            for (branch, parent) in &parents {
                if let Some(base) = merge_base(branch, parent) {
                    merge_bases.insert(branch.clone(), base);
                }
            }
        }

        let mut children: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (branch, parent) in &parents {
            children.entry(parent.as_str()).or_default().push(branch.as_str());
        }
        let mut roots: Vec<&str> = locals
            .iter()
            .map(|b| b.name.as_str())
            .filter(|name| !parents.contains_key(*name))
            .collect();
        roots.sort_by_key(|name| (trunk_rank(name), name.to_string()));
        roots.dedup();

        let root_nodes: Vec<BranchTreeNode> =
            roots.iter().map(|name| nest(name, &children)).collect();
        let local_children = if root_nodes.len() > self.root_group_threshold {
            group_by_prefix(root_nodes)
        } else {
            root_nodes
        };

        log::debug!(
            "branch tree: {} local ({} parented), {} remote",
            locals.len(),
            parents.len(),
            self.branches.len() - locals.len()
        );

        BranchTree {
            local: BranchTreeNode::Group {
                label: "Local branches".to_string(),
                children: local_children,
            },
            remote: BranchTreeNode::Group {
                label: "Remote branches".to_string(),
                children: self.remote_groups(),
            },
            parents,
            merge_bases,
        }
    }

    fn resolve_parent(&self, branch: &BranchInfo, names: &HashSet<&str>) -> Option<String> {
        if TRUNK_NAMES.contains(&branch.name.as_str()) {
            return None;
        }
        if let Some(upstream) = branch.upstream.as_deref() {
            return local_upstream(upstream, &branch.name, names);
        }
        if !self.infer_parents {
            return None;
        }
        let candidates: &[&str] = match branch.name.split_once('/') {
            Some(("hotfix" | "release", _)) => &["main", "master"],
            Some(("feature" | "bugfix" | "chore" | "test", _)) => {
                &["develop", "dev", "main", "master"]
            }
            _ => return None,
        };
        candidates
            .iter()
            .find(|candidate| names.contains(*candidate))
            .map(|candidate| candidate.to_string())
    }

    fn remote_groups(&self) -> Vec<BranchTreeNode> {
        let mut by_remote: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for branch in self.branches.iter().filter(|b| b.is_remote) {
            if branch.is_remote_head() {
                continue;
            }
            let (Some(remote), Some(short)) = (branch.remote_name(), branch.remote_short_name())
            else {
                continue;
            };
            by_remote.entry(remote).or_default().push(short);
        }
        by_remote
            .into_iter()
            .map(|(remote, mut names)| {
                names.sort_unstable();
                BranchTreeNode::Group {
                    label: remote.to_string(),
                    children: names
                        .into_iter()
                        .map(|name| BranchTreeNode::Branch {
                            name: name.to_string(),
                            children: Vec::new(),
                        })
                        .collect(),
                }
            })
            .collect()
    }
}

/// Local branch named by an upstream, either directly or as `<remote>/<name>`
fn local_upstream(upstream: &str, own_name: &str, names: &HashSet<&str>) -> Option<String> {
    if upstream != own_name && names.contains(upstream) {
        return Some(upstream.to_string());
    }
    let (_, short) = upstream.split_once('/')?;
    (short != own_name && names.contains(short)).then(|| short.to_string())
}

fn trunk_rank(name: &str) -> usize {
    TRUNK_NAMES
        .iter()
        .position(|trunk| *trunk == name)
        .unwrap_or(TRUNK_NAMES.len())
}

/// Drop the parent link of one branch on every parent cycle
fn break_cycles(parents: &mut BTreeMap<String, String>) {
    let names: Vec<String> = parents.keys().cloned().collect();
    for name in names {
        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(name.as_str());
        let mut current = parents.get(&name).map(String::as_str);
        let mut closes_on_self = false;
        while let Some(parent) = current {
            if parent == name {
                closes_on_self = true;
                break;
            }
            if !seen.insert(parent) {
                break;
            }
            current = parents.get(parent).map(String::as_str);
        }
        if closes_on_self {
            log::debug!("breaking branch parent cycle at {name}");
            parents.remove(&name);
        }
    }
}

fn nest(name: &str, children: &BTreeMap<&str, Vec<&str>>) -> BranchTreeNode {
    let nested = children
        .get(name)
        .map(|kids| kids.iter().map(|kid| nest(kid, children)).collect())
        .unwrap_or_default();
    BranchTreeNode::Branch {
        name: name.to_string(),
        children: nested,
    }
}

/// Group root branches by the namespace before their first `/`
fn group_by_prefix(roots: Vec<BranchTreeNode>) -> Vec<BranchTreeNode> {
    let mut plain = Vec::new();
    let mut groups: BTreeMap<String, Vec<BranchTreeNode>> = BTreeMap::new();
    for node in roots {
        match node.label().split_once('/') {
            Some((prefix, _)) => groups.entry(prefix.to_string()).or_default().push(node),
            None => plain.push(node),
        }
    }
    plain.extend(
        groups
            .into_iter()
            .map(|(label, children)| BranchTreeNode::Group { label, children }),
    );
    plain
}
