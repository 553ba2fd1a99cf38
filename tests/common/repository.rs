//! Creation and manipulation of throwaway git repositories.

#![allow(dead_code)]

use assert_cmd::prelude::*;
use git_atlas::core::error::{GitAtlasError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A repository living in a temporary directory.
///
/// The `TempDir` must stay alive for the duration of the test. `config_home` is an
/// empty directory handed to the binary as `XDG_CONFIG_HOME` so that a developer's
/// own configuration never leaks into a test.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub path: PathBuf,
    pub config_home: PathBuf,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The git-atlas binary, ready to run inside this repository
    pub fn atlas(&self) -> anyhow::Result<Command> {
        let mut cmd = Command::cargo_bin("git-atlas")?;
        cmd.current_dir(&self.path)
            .env("XDG_CONFIG_HOME", &self.config_home)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        Ok(cmd)
    }

    /// Run git in the repository and return its stdout, failing on a non-zero exit
    pub fn git(&self, args: &[&str]) -> Result<String> {
        git(&self.path, args)
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<()> {
        create_file(&self.path, filename, content)
    }

    pub fn commit_file(&self, filename: &str, content: &str, message: &str) -> Result<()> {
        self.write(filename, content)?;
        self.git(&["add", "--", filename])?;
        self.git(&["commit", "-q", "-m", message])?;
        Ok(())
    }

    pub fn staged_diff(&self, filename: &str) -> Result<String> {
        self.git(&["diff", "--cached", "--no-color", "--", filename])
    }

    pub fn unstaged_diff(&self, filename: &str) -> Result<String> {
        self.git(&["diff", "--no-color", "--", filename])
    }
}

pub fn git(repo_path: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .output()?;
    if !output.status.success() {
        return Err(GitAtlasError::command_failed(
            format!("git {}", args.join(" ")),
            output.status.code(),
            &String::from_utf8_lossy(&output.stderr),
            &String::from_utf8_lossy(&output.stdout),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// A fresh repository on branch `main` with no commits
pub fn setup_test_repo() -> Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("repo");
    let config_home = temp_dir.path().join("config");
    fs::create_dir_all(&path)?;
    fs::create_dir_all(&config_home)?;

    git(&path, &["init", "-q"])?;
    git(&path, &["symbolic-ref", "HEAD", "refs/heads/main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["config", "commit.gpgsign", "false"])?;
    git(&path, &["config", "core.autocrlf", "false"])?;

    Ok(TestRepo {
        temp_dir,
        path,
        config_home,
    })
}

/// A repository with one commit containing `initial.txt`
pub fn setup_test_repo_with_initial_commit() -> Result<TestRepo> {
    let repo = setup_test_repo()?;
    repo.commit_file("initial.txt", "initial content\n", "Initial commit")?;
    Ok(repo)
}

pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> Result<()> {
    let path = repo_path.join(filename);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
