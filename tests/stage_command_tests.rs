use assert_cmd::prelude::*;
use predicates::prelude::*;

mod common;
use common::{fixtures::*, repository::*};

#[cfg(test)]
mod stage_command_tests {
    use super::*;

    #[test]
    fn test_stage_whole_file_and_unstage_it() -> anyhow::Result<()> {
        let repo = create_two_hunk_repo()?;

        repo.atlas()?
            .args(["stage", "numbers.txt"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Staged numbers.txt"));
        assert!(repo.unstaged_diff("numbers.txt")?.is_empty());

        repo.atlas()?
            .args(["unstage", "numbers.txt"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Unstaged numbers.txt"));
        assert!(repo.staged_diff("numbers.txt")?.is_empty());

        Ok(())
    }

    #[test]
    fn test_stage_single_hunk() -> anyhow::Result<()> {
        let repo = create_two_hunk_repo()?;

        repo.atlas()?
            .args(["stage", "numbers.txt", "--hunk", "2"])
            .assert()
            .success();

        let staged = repo.staged_diff("numbers.txt")?;
        assert!(staged.contains("+line 18.5"));
        assert!(!staged.contains("LINE 2"));
        let unstaged = repo.unstaged_diff("numbers.txt")?;
        assert!(unstaged.contains("+LINE 2"));
        assert!(!unstaged.contains("line 18.5"));

        Ok(())
    }

    #[test]
    fn test_stage_selected_addition_only() -> anyhow::Result<()> {
        let repo = create_two_hunk_repo()?;

        repo.atlas()?
            .args(["stage", "numbers.txt", "--hunk", "1", "--lines", "2"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Staged 1 line of hunk 1"));

        let staged = repo.staged_diff("numbers.txt")?;
        assert!(staged.contains("+LINE 2"));
        assert!(!staged.contains("-line 2"));
        assert!(!staged.contains("line 18.5"));

        // The index now holds both lines; the worktree still lacks the old one.
        let unstaged = repo.unstaged_diff("numbers.txt")?;
        assert!(unstaged.contains("-line 2"));
        assert!(!unstaged.contains("+LINE 2"));

        Ok(())
    }

    #[test]
    fn test_stage_hunks_one_after_another() -> anyhow::Result<()> {
        let repo = create_two_hunk_repo()?;

        repo.atlas()?
            .args(["stage", "numbers.txt", "--hunk", "1", "--lines", "1-2"])
            .assert()
            .success();
        repo.atlas()?
            .args(["stage", "numbers.txt", "--hunk", "1", "--lines", "1"])
            .assert()
            .success();

        assert!(repo.unstaged_diff("numbers.txt")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_unstage_selected_deletion() -> anyhow::Result<()> {
        let repo = create_two_hunk_repo()?;
        repo.git(&["add", "numbers.txt"])?;

        repo.atlas()?
            .args(["unstage", "numbers.txt", "--hunk", "1", "--lines", "1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Unstaged 1 line of hunk 1"));

        let staged = repo.staged_diff("numbers.txt")?;
        assert!(staged.contains("+LINE 2"));
        assert!(!staged.contains("-line 2"));
        assert!(staged.contains("+line 18.5"));

        Ok(())
    }

    #[test]
    fn test_selecting_no_change_applies_nothing() -> anyhow::Result<()> {
        let repo = create_two_hunk_repo()?;

        repo.atlas()?
            .args(["stage", "numbers.txt", "--hunk", "1", "--lines", ""])
            .assert()
            .success()
            .stdout(predicate::str::contains("nothing applied"));
        assert!(repo.staged_diff("numbers.txt")?.is_empty());

        Ok(())
    }

    #[test]
    fn test_out_of_range_selections_fail() -> anyhow::Result<()> {
        let repo = create_two_hunk_repo()?;

        repo.atlas()?
            .args(["stage", "numbers.txt", "--hunk", "3"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Hunk 3 is out of range (1-2 available)"));

        repo.atlas()?
            .args(["stage", "numbers.txt", "--hunk", "1", "--lines", "5"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Line 5 is out of range"));

        Ok(())
    }

    #[test]
    fn test_lines_require_hunk() -> anyhow::Result<()> {
        let repo = create_two_hunk_repo()?;

        repo.atlas()?
            .args(["stage", "numbers.txt", "--lines", "1"])
            .assert()
            .failure();

        Ok(())
    }

    #[test]
    fn test_stage_last_line_without_newline() -> anyhow::Result<()> {
        let repo = setup_test_repo()?;
        repo.commit_file("tail.txt", "a\nb\n", "Base")?;
        repo.write("tail.txt", "a\nb\nc")?;

        repo.atlas()?
            .args(["stage", "tail.txt", "--hunk", "1", "--lines", "1"])
            .assert()
            .success();

        assert!(repo.unstaged_diff("tail.txt")?.is_empty());
        let staged = repo.git(&["show", ":tail.txt"])?;
        assert_eq!(staged, "a\nb\nc");

        Ok(())
    }

    #[test]
    fn test_unstage_deletion_of_line_without_newline() -> anyhow::Result<()> {
        let repo = setup_test_repo()?;
        repo.commit_file("tail.txt", "a\nb", "Base")?;
        repo.write("tail.txt", "a\nb\nc\n")?;
        repo.git(&["add", "--", "tail.txt"])?;

        repo.atlas()?
            .args(["unstage", "tail.txt", "--hunk", "1", "--lines", "1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Unstaged 1 line of hunk 1 in tail.txt"));

        let staged = repo.git(&["show", ":tail.txt"])?;
        assert_eq!(staged, "a\nb\nb\nc\n");

        Ok(())
    }
}
