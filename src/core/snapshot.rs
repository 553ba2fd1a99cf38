//! One consistent, immutable view of a repository.
//!
//! [`SnapshotBuilder`] runs the git commands, feeds their output to the record parsers,
//! lays out the commit graph and infers the branch tree. It holds no state between
//! builds: every refresh produces a brand new [`RepositorySnapshot`].

use crate::core::branch_tree::{BranchTree, BranchTreeBuilder};
use crate::core::config::AtlasConfig;
use crate::core::error::Result;
use crate::core::git_status::GitStatus;
use crate::core::graph::{build_commits, Commit};
use crate::core::porcelain::{parse_remotes, parse_status, parse_submodules, parse_worktrees};
use crate::core::records::{
    parse_log, parse_refs, parse_stashes, parse_tags, LOG_FORMAT, REF_FORMAT, STASH_FORMAT,
    TAG_FORMAT,
};
use crate::core::runner::{CommandOutput, CommandRunner};
use crate::core::state::{
    BranchInfo, FileEntry, RemoteInfo, StashEntry, SubmoduleInfo, TagInfo, Timestamp,
    WorktreeItem,
};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct RepositorySnapshot {
    pub workdir: PathBuf,
    /// `None` before the first commit
    pub head: Option<String>,
    /// `None` when HEAD is detached or unborn
    pub current_branch: Option<String>,
    pub branches: Vec<BranchInfo>,
    pub branch_tree: BranchTree,
    pub tags: Vec<TagInfo>,
    pub stashes: Vec<StashEntry>,
    pub worktrees: Vec<WorktreeItem>,
    pub remotes: Vec<RemoteInfo>,
    pub submodules: Vec<SubmoduleInfo>,
    pub commits: Vec<Commit>,
    pub changes: Vec<FileEntry>,
    pub conflicted_files: Vec<PathBuf>,
    pub is_merging: bool,
    pub is_rebasing: bool,
    pub is_cherry_picking: bool,
    pub is_reverting: bool,
    pub has_conflicts: bool,
    pub taken_at: Timestamp,
}

impl RepositorySnapshot {
    pub fn is_detached(&self) -> bool {
        self.head.is_some() && self.current_branch.is_none()
    }

    pub fn local_branches(&self) -> impl Iterator<Item = &BranchInfo> {
        self.branches.iter().filter(|b| !b.is_remote)
    }

    pub fn find_commit(&self, hash: &str) -> Option<&Commit> {
        self.commits.iter().find(|c| c.parsed.hash.starts_with(hash))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotOptions {
    pub max_commits: usize,
    pub include_remote_commits: bool,
    pub infer_branch_parents: bool,
    pub merge_base_branch_limit: usize,
    pub root_group_threshold: usize,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self::from(&AtlasConfig::default())
    }
}

impl From<&AtlasConfig> for SnapshotOptions {
    fn from(config: &AtlasConfig) -> Self {
        Self {
            max_commits: config.max_commits,
            include_remote_commits: config.include_remote_commits,
            infer_branch_parents: config.infer_branch_parents,
            merge_base_branch_limit: config.merge_base_branch_limit,
            root_group_threshold: config.root_group_threshold,
        }
    }
}

pub struct SnapshotBuilder<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    workdir: &'a Path,
    options: SnapshotOptions,
}

impl<'a, R: CommandRunner + ?Sized> SnapshotBuilder<'a, R> {
    pub fn new(runner: &'a R, workdir: &'a Path) -> Self {
        Self {
            runner,
            workdir,
            options: SnapshotOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SnapshotOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(&self) -> Result<RepositorySnapshot> {
        let head = self.stdout_if_ok(&["rev-parse", "--verify", "-q", "HEAD"])?;
        let current_branch = self.stdout_if_ok(&["symbolic-ref", "--short", "-q", "HEAD"])?;

        let branches = self.branches()?;
        let tag_format = format!("--format={TAG_FORMAT}");
        let tags = parse_tags(
            &self
                .runner
                .run(&["for-each-ref", &tag_format, "refs/tags"], self.workdir)?
                .stdout,
        );

        let stash_format = format!("--format={STASH_FORMAT}");
        let stashes = parse_stashes(&self.optional_output(&["stash", "list", &stash_format])?);
        let worktrees =
            parse_worktrees(&self.optional_output(&["worktree", "list", "--porcelain"])?);
        let remotes = parse_remotes(&self.optional_output(&["remote", "-v"])?);
        let submodules = parse_submodules(&self.optional_output(&["submodule", "status"])?);

        let changes = parse_status(
            &self
                .runner
                .run(
                    &["status", "--porcelain=v1", "-z", "--untracked-files=all"],
                    self.workdir,
                )?
                .stdout,
        );
        let conflicted_files: Vec<PathBuf> = changes
            .iter()
            .filter(|f| f.status == GitStatus::Unmerged)
            .map(|f| f.path.clone())
            .collect();

        let is_merging = self.ref_exists("MERGE_HEAD")?;
        let is_cherry_picking = self.ref_exists("CHERRY_PICK_HEAD")?;
        let is_reverting = self.ref_exists("REVERT_HEAD")?;
        let is_rebasing =
            self.git_path_exists("rebase-merge")? || self.git_path_exists("rebase-apply")?;

        let has_refs = !branches.is_empty() || !tags.is_empty();
        let commits = self.commits(head.is_some(), has_refs, !stashes.is_empty())?;
        let branch_tree = self.branch_tree(&branches);

        log::debug!(
            "snapshot of {}: {} commits, {} branches, {} changes",
            self.workdir.display(),
            commits.len(),
            branches.len(),
            changes.len()
        );

        Ok(RepositorySnapshot {
            workdir: self.workdir.to_path_buf(),
            head,
            current_branch,
            branches,
            branch_tree,
            tags,
            stashes,
            worktrees,
            remotes,
            submodules,
            commits,
            has_conflicts: !conflicted_files.is_empty(),
            changes,
            conflicted_files,
            is_merging,
            is_rebasing,
            is_cherry_picking,
            is_reverting,
            taken_at: chrono::Local::now().fixed_offset(),
        })
    }

    /// Local and remote branches
    pub fn branches(&self) -> Result<Vec<BranchInfo>> {
        let format = format!("--format={REF_FORMAT}");
        let output = self.runner.run(
            &["for-each-ref", &format, "refs/heads", "refs/remotes"],
            self.workdir,
        )?;
        Ok(parse_refs(&output.stdout))
    }

    fn commits(&self, has_head: bool, has_refs: bool, has_stash: bool) -> Result<Vec<Commit>> {
        if !has_head && !has_refs {
            return Ok(Vec::new());
        }
        let limit = self.options.max_commits.to_string();
        let format = format!("--format={LOG_FORMAT}");
        let mut args = vec!["log", "--topo-order", format.as_str(), "-n", limit.as_str()];
        if has_head {
            args.push("HEAD");
        }
        args.extend(["--branches", "--tags"]);
        if self.options.include_remote_commits {
            args.push("--remotes");
        }
        if has_stash {
            args.push("refs/stash");
        }
        args.push("--");
        let parsed = parse_log(&self.runner.run(&args, self.workdir)?.stdout);

        let main_chain: HashSet<String> = if has_head {
            self.runner
                .run(
                    &["rev-list", "--first-parent", "-n", limit.as_str(), "HEAD"],
                    self.workdir,
                )?
                .stdout
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            HashSet::new()
        };

        Ok(build_commits(parsed, &main_chain))
    }

    /// Branch hierarchy, with merge bases looked up through the runner
    pub fn branch_tree(&self, branches: &[BranchInfo]) -> BranchTree {
        BranchTreeBuilder::new(branches)
            .with_inference(self.options.infer_branch_parents)
            .with_merge_base_limit(self.options.merge_base_branch_limit)
            .with_root_group_threshold(self.options.root_group_threshold)
            .build_with_merge_bases(|branch, parent| {
                match self
                    .runner
                    .run_fail_soft(&["merge-base", branch, parent], self.workdir)
                {
                    Ok(output) if output.success() => non_empty(output.stdout.trim()),
                    Ok(_) => None,
                    Err(e) => {
                        log::debug!("merge-base {branch} {parent} failed: {e}");
                        None
                    }
                }
            })
    }

    /// Trimmed stdout of a command whose failure just means "absent"
    fn stdout_if_ok(&self, args: &[&str]) -> Result<Option<String>> {
        let output = self.runner.run_fail_soft(args, self.workdir)?;
        Ok(if output.success() {
            non_empty(output.stdout.trim())
        } else {
            None
        })
    }

    /// Output of an auxiliary listing; a failing listing is treated as empty
    fn optional_output(&self, args: &[&str]) -> Result<String> {
        let CommandOutput {
            stdout,
            stderr,
            status,
        } = self.runner.run_fail_soft(args, self.workdir)?;
        if status == Some(0) {
            Ok(stdout)
        } else {
            log::debug!("`git {}` failed, treating as empty: {}", args.join(" "), stderr.trim());
            Ok(String::new())
        }
    }

    fn ref_exists(&self, name: &str) -> Result<bool> {
        Ok(self
            .runner
            .run_fail_soft(&["rev-parse", "--verify", "-q", name], self.workdir)?
            .success())
    }

    fn git_path_exists(&self, name: &str) -> Result<bool> {
        Ok(self
            .stdout_if_ok(&["rev-parse", "--git-path", name])?
            .map(|path| self.workdir.join(path).exists())
            .unwrap_or(false))
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}
