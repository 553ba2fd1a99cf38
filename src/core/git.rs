//! Repository façade over a [`CommandRunner`].
//!
//! [`GitRepo`] is what the commands talk to. It locates the working tree, builds
//! snapshots, and turns hunk or line selections into `git apply --cached` calls.
//!
//! # Public API
//! - [`GitRepo`]: open a repository and query or stage against it
//! - [`StageOutcome`]: result of a stage/unstage request
//!
//! # Key Features
//! - **Snapshots**: [`GitRepo::refresh`] publishes only the newest of overlapping refreshes
//! - **Partial staging**: whole files, single hunks, or selected lines of a hunk
//! - **History**: blame, reflog, worktrees and per-commit detail

use crate::core::{
    branch_tree::BranchTree,
    config::AtlasConfig,
    error::{GitAtlasError, Result},
    hunk::{build_hunks_patch, parse_diff_hunks, DiffHunk},
    patch::{apply_arguments, select_lines, PatchDirection},
    porcelain::{parse_blame, parse_status, parse_worktrees},
    records::{
        parse_commit_detail, parse_name_status, parse_reflog, DETAIL_FORMAT, REFLOG_FORMAT,
    },
    refresh::RequestGate,
    runner::{CommandRunner, GitCli},
    snapshot::{RepositorySnapshot, SnapshotBuilder, SnapshotOptions},
    state::{BlameEntry, BranchInfo, CommitDetail, FileEntry, ReflogEntry, WorktreeItem},
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_REFLOG_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Applied { hunks: usize, changes: usize },
    NothingToApply,
}

pub struct GitRepo<R: CommandRunner = GitCli> {
    runner: R,
    workdir: PathBuf,
    options: SnapshotOptions,
    snapshots: RequestGate<RepositorySnapshot>,
    details: RequestGate<CommitDetail>,
}

impl GitRepo<GitCli> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, &AtlasConfig::default())
    }

    pub fn open_with_config<P: AsRef<Path>>(path: P, config: &AtlasConfig) -> Result<Self> {
        let repo = Self::with_runner(GitCli::new(&config.git_binary), path)?;
        Ok(repo.with_options(SnapshotOptions::from(config)))
    }
}

impl<R: CommandRunner> GitRepo<R> {
    /// Open the repository containing `path` using `runner` for every git call
    pub fn with_runner<P: AsRef<Path>>(runner: R, path: P) -> Result<Self> {
        let path = path.as_ref();
        let output = match runner.run_fail_soft(&["rev-parse", "--show-toplevel"], path) {
            Ok(output) => output,
            Err(e @ GitAtlasError::GitNotAvailable { .. }) => return Err(e),
            Err(e) => {
                log::debug!("cannot probe {}: {e}", path.display());
                return Err(GitAtlasError::NotInGitRepo);
            }
        };
        let toplevel = output.stdout.trim();
        if !output.success() || toplevel.is_empty() {
            return Err(GitAtlasError::NotInGitRepo);
        }
        log::debug!("opened repository at {toplevel}");

        Ok(Self {
            runner,
            workdir: PathBuf::from(toplevel),
            options: SnapshotOptions::default(),
            snapshots: RequestGate::new(),
            details: RequestGate::new(),
        })
    }

    pub fn with_options(mut self, options: SnapshotOptions) -> Self {
        self.options = options;
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        Ok(self.runner.run(args, &self.workdir)?.stdout)
    }

    pub fn status(&self) -> Result<Vec<FileEntry>> {
        let output = self.git(&["status", "--porcelain=v1", "-z", "--untracked-files=all"])?;
        Ok(parse_status(&output))
    }

    /// Short name of the checked-out branch, `None` when detached
    pub fn current_branch(&self) -> Result<Option<String>> {
        let output = self
            .runner
            .run_fail_soft(&["symbolic-ref", "--short", "-q", "HEAD"], &self.workdir)?;
        let name = output.stdout.trim();
        Ok((output.success() && !name.is_empty()).then(|| name.to_string()))
    }

    fn has_head(&self) -> Result<bool> {
        Ok(self
            .runner
            .run_fail_soft(&["rev-parse", "--verify", "-q", "HEAD"], &self.workdir)?
            .success())
    }

    pub fn snapshot(&self) -> Result<RepositorySnapshot> {
        SnapshotBuilder::new(&self.runner, &self.workdir)
            .with_options(self.options.clone())
            .build()
    }

    /// Build a snapshot and publish it unless a newer refresh started meanwhile.
    ///
    /// Returns `Ok(None)` for a superseded refresh, whether it succeeded or failed.
    pub fn refresh(&self) -> Result<Option<Arc<RepositorySnapshot>>> {
        let token = self.snapshots.begin();
        self.snapshots.settle(token, self.snapshot())
    }

    pub fn latest_snapshot(&self) -> Option<Arc<RepositorySnapshot>> {
        self.snapshots.latest()
    }

    pub fn branches(&self) -> Result<Vec<BranchInfo>> {
        SnapshotBuilder::new(&self.runner, &self.workdir).branches()
    }

    pub fn branch_tree(&self, branches: &[BranchInfo]) -> BranchTree {
        SnapshotBuilder::new(&self.runner, &self.workdir)
            .with_options(self.options.clone())
            .branch_tree(branches)
    }

    /// Metadata of the commit HEAD points at, `None` before the first commit
    pub fn head_commit(&self) -> Result<Option<CommitDetail>> {
        if !self.has_head()? {
            return Ok(None);
        }
        self.fetch_commit_detail("HEAD")
    }

    pub fn diff_text(&self, path: &str, staged: bool) -> Result<String> {
        let mut args = vec!["diff", "--no-color", "--no-ext-diff"];
        if staged {
            args.push("--cached");
        }
        args.extend(["--", path]);
        self.git(&args)
    }

    /// Hunks of the worktree diff, or of the staged diff when `staged`
    pub fn file_diff(&self, path: &str, staged: bool) -> Result<Vec<DiffHunk>> {
        Ok(parse_diff_hunks(&self.diff_text(path, staged)?))
    }

    pub fn stage_file(&self, path: &str) -> Result<()> {
        self.git(&["add", "--", path]).map(|_| ())
    }

    pub fn unstage_file(&self, path: &str) -> Result<()> {
        if self.has_head()? {
            self.git(&["reset", "-q", "HEAD", "--", path]).map(|_| ())
        } else {
            self.git(&["rm", "--cached", "-q", "--", path]).map(|_| ())
        }
    }

    pub fn stage_hunk(&self, path: &str, hunk_number: usize) -> Result<StageOutcome> {
        self.apply_hunk(path, hunk_number, PatchDirection::Stage)
    }

    pub fn unstage_hunk(&self, path: &str, hunk_number: usize) -> Result<StageOutcome> {
        self.apply_hunk(path, hunk_number, PatchDirection::Unstage)
    }

    /// Stage the changes at `selected` line indices of hunk `hunk_number` (1-based)
    pub fn stage_lines(
        &self,
        path: &str,
        hunk_number: usize,
        selected: &BTreeSet<usize>,
    ) -> Result<StageOutcome> {
        self.apply_lines(path, hunk_number, selected, PatchDirection::Stage)
    }

    pub fn unstage_lines(
        &self,
        path: &str,
        hunk_number: usize,
        selected: &BTreeSet<usize>,
    ) -> Result<StageOutcome> {
        self.apply_lines(path, hunk_number, selected, PatchDirection::Unstage)
    }

    /// The hunk a stage/unstage request refers to, read from the matching diff side
    pub fn select_hunk(
        &self,
        path: &str,
        hunk_number: usize,
        direction: PatchDirection,
    ) -> Result<DiffHunk> {
        let mut hunks = self.file_diff(path, direction == PatchDirection::Unstage)?;
        if hunks.is_empty() {
            return Err(GitAtlasError::no_changes(path));
        }
        if hunk_number == 0 || hunk_number > hunks.len() {
            return Err(GitAtlasError::hunk_out_of_range(hunk_number, hunks.len()));
        }
        Ok(hunks.swap_remove(hunk_number - 1))
    }

    fn apply_hunk(
        &self,
        path: &str,
        hunk_number: usize,
        direction: PatchDirection,
    ) -> Result<StageOutcome> {
        let hunk = self.select_hunk(path, hunk_number, direction)?;
        self.apply_patch(path, &[hunk], direction)
    }

    fn apply_lines(
        &self,
        path: &str,
        hunk_number: usize,
        selected: &BTreeSet<usize>,
        direction: PatchDirection,
    ) -> Result<StageOutcome> {
        let hunk = self.select_hunk(path, hunk_number, direction)?;
        self.apply_selection(path, &hunk, selected, direction)
    }

    /// Apply only the changes at `selected` line indices of an already loaded hunk
    pub fn apply_selection(
        &self,
        path: &str,
        hunk: &DiffHunk,
        selected: &BTreeSet<usize>,
        direction: PatchDirection,
    ) -> Result<StageOutcome> {
        match select_lines(hunk, selected, direction) {
            Some(rewritten) => self.apply_patch(path, &[rewritten], direction),
            None => Ok(StageOutcome::NothingToApply),
        }
    }

    fn apply_patch(
        &self,
        path: &str,
        hunks: &[DiffHunk],
        direction: PatchDirection,
    ) -> Result<StageOutcome> {
        let patch = build_hunks_patch(path, hunks);
        let args = apply_arguments(path, hunks, direction);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        log::debug!("applying {direction:?} patch for {path}:\n{patch}");
        self.runner.run_with_stdin(&args, &self.workdir, &patch)?;

        Ok(StageOutcome::Applied {
            hunks: hunks.len(),
            changes: hunks.iter().map(|h| h.additions() + h.deletions()).sum(),
        })
    }

    pub fn blame(&self, path: &str) -> Result<Vec<BlameEntry>> {
        Ok(parse_blame(&self.git(&["blame", "--porcelain", "--", path])?))
    }

    pub fn reflog(&self, limit: usize) -> Result<Vec<ReflogEntry>> {
        let format = format!("--format={REFLOG_FORMAT}");
        let limit = limit.to_string();
        let output = self
            .runner
            .run_fail_soft(&["reflog", "show", &format, "-n", &limit], &self.workdir)?;
        // An unborn branch has no reflog yet.
        if !output.success() {
            log::debug!("reflog unavailable: {}", output.stderr.trim());
            return Ok(Vec::new());
        }
        Ok(parse_reflog(&output.stdout))
    }

    pub fn worktrees(&self) -> Result<Vec<WorktreeItem>> {
        Ok(parse_worktrees(&self.git(&["worktree", "list", "--porcelain"])?))
    }

    pub fn merge_base(&self, left: &str, right: &str) -> Result<Option<String>> {
        let output = self
            .runner
            .run_fail_soft(&["merge-base", left, right], &self.workdir)?;
        let base = output.stdout.trim();
        Ok((output.success() && !base.is_empty()).then(|| base.to_string()))
    }

    /// Metadata and changed files of one commit, ungated
    pub fn fetch_commit_detail(&self, hash: &str) -> Result<Option<CommitDetail>> {
        let format = format!("--format={DETAIL_FORMAT}");
        let Some(mut detail) =
            parse_commit_detail(&self.git(&["show", "-s", &format, hash, "--"])?)
        else {
            return Ok(None);
        };
        let files = self.git(&[
            "diff-tree",
            "--no-commit-id",
            "--name-status",
            "-r",
            "--root",
            "-z",
            &detail.hash,
        ])?;
        detail.files = parse_name_status(&files);
        Ok(Some(detail))
    }

    /// Fetch a commit's detail, publishing it only if no newer detail request began
    pub fn commit_detail(&self, hash: &str) -> Result<Option<Arc<CommitDetail>>> {
        let token = self.details.begin();
        match self.fetch_commit_detail(hash).transpose() {
            Some(result) => self.details.settle(token, result),
            None => Ok(None),
        }
    }

    pub fn latest_commit_detail(&self) -> Option<Arc<CommitDetail>> {
        self.details.latest()
    }
}
