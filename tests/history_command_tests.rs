use assert_cmd::prelude::*;
use predicates::prelude::*;

mod common;
use common::{fixtures::*, repository::*};

#[cfg(test)]
mod history_command_tests {
    use super::*;

    #[test]
    fn test_blame_shows_author_and_content() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        repo.commit_file("initial.txt", "initial content\nsecond line\n", "Extend")?;

        repo.atlas()?
            .args(["blame", "initial.txt"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Test User"))
            .stdout(predicate::str::contains("initial content"))
            .stdout(predicate::str::contains("second line"));

        Ok(())
    }

    #[test]
    fn test_reflog_lists_commits() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        repo.commit_file("b.txt", "b\n", "Second commit")?;

        repo.atlas()?
            .args(["reflog", "--limit", "5"])
            .assert()
            .success()
            .stdout(predicate::str::contains("HEAD@{0}"))
            .stdout(predicate::str::contains("commit: Second commit"))
            .stdout(predicate::str::contains("commit (initial): Initial commit"));

        Ok(())
    }

    #[test]
    fn test_worktrees_lists_main_and_linked() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let linked = repo.temp_dir.path().join("linked");
        let linked_path = linked.to_string_lossy().into_owned();
        repo.git(&["worktree", "add", "-q", "-b", "side", &linked_path])?;

        repo.atlas()?
            .arg("worktrees")
            .assert()
            .success()
            .stdout(predicate::str::contains("Worktrees"))
            .stdout(predicate::str::contains("[main]"))
            .stdout(predicate::str::contains("side"))
            .stdout(predicate::str::contains("linked"));

        Ok(())
    }

    #[test]
    fn test_show_commit_detail() -> anyhow::Result<()> {
        let repo = create_merge_repo()?;

        repo.atlas()?
            .args(["show", "HEAD~1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Author: Test User <test@example.com>"))
            .stdout(predicate::str::contains("Third"))
            .stdout(predicate::str::contains("c.txt"));

        repo.atlas()?
            .args(["show", "HEAD"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Merge:"));

        Ok(())
    }

    #[test]
    fn test_show_unknown_commit_fails() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;

        repo.atlas()?
            .args(["show", "does-not-exist"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("git show"));

        Ok(())
    }
}
