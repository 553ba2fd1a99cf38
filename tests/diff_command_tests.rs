use assert_cmd::prelude::*;
use predicates::prelude::*;

mod common;
use common::{fixtures::*, repository::*};

#[cfg(test)]
mod diff_command_tests {
    use super::*;

    #[test]
    fn test_diff_numbers_hunks_and_change_lines() -> anyhow::Result<()> {
        let repo = create_two_hunk_repo()?;

        repo.atlas()?
            .args(["diff", "numbers.txt"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Hunk 1: @@ -1,5 +1,5 @@"))
            .stdout(predicate::str::contains("Hunk 2:"))
            .stdout(predicate::str::contains("[1] -line 2"))
            .stdout(predicate::str::contains("[2] +LINE 2"))
            .stdout(predicate::str::contains("[1] +line 18.5"));

        Ok(())
    }

    #[test]
    fn test_diff_staged_side() -> anyhow::Result<()> {
        let repo = create_two_hunk_repo()?;
        repo.git(&["add", "numbers.txt"])?;

        repo.atlas()?
            .args(["diff", "numbers.txt"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No unstaged changes in numbers.txt"));

        repo.atlas()?
            .args(["diff", "--staged", "numbers.txt"])
            .assert()
            .success()
            .stdout(predicate::str::contains("+LINE 2"));

        Ok(())
    }

    #[test]
    fn test_diff_reports_missing_newline() -> anyhow::Result<()> {
        let repo = setup_test_repo()?;
        repo.commit_file("tail.txt", "a\nb", "No trailing newline")?;
        repo.write("tail.txt", "a\nc")?;

        repo.atlas()?
            .args(["diff", "tail.txt"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No newline at end of file"));

        Ok(())
    }
}
