use serde_json::Value;

mod common;
use common::{fixtures::*, repository::*};

fn snapshot(repo: &TestRepo) -> anyhow::Result<Value> {
    let output = repo.atlas()?.arg("snapshot").output()?;
    assert!(output.status.success(), "snapshot failed: {output:?}");
    Ok(serde_json::from_slice(&output.stdout)?)
}

#[cfg(test)]
mod snapshot_command_tests {
    use super::*;

    #[test]
    fn test_snapshot_of_merge_repository() -> anyhow::Result<()> {
        let repo = create_merge_repo()?;
        repo.git(&["tag", "-a", "v1.0", "-m", "release"])?;
        repo.write("a.txt", "changed\n")?;
        repo.write("untracked.txt", "new\n")?;

        let snapshot = snapshot(&repo)?;
        assert_eq!(snapshot["current_branch"], "main");
        assert_eq!(snapshot["commits"].as_array().map(Vec::len), Some(5));
        assert_eq!(snapshot["branches"].as_array().map(Vec::len), Some(3));
        assert_eq!(snapshot["tags"][0]["name"], "v1.0");
        assert_eq!(snapshot["tags"][0]["target"], snapshot["head"]);
        assert_eq!(snapshot["changes"].as_array().map(Vec::len), Some(2));
        assert_eq!(snapshot["worktrees"][0]["is_main"], true);
        assert_eq!(snapshot["has_conflicts"], false);
        assert_eq!(snapshot["is_merging"], false);
        assert_eq!(snapshot["branch_tree"]["parents"]["feature/login"], "develop");

        let head = &snapshot["commits"][0];
        let decorations: Vec<&str> = head["decorations"]
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .collect();
        assert!(decorations.contains(&"HEAD"));
        assert!(decorations.contains(&"main"));
        assert!(decorations.contains(&"tag: v1.0"));
        Ok(())
    }

    #[test]
    fn test_snapshot_includes_stash() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        repo.write("initial.txt", "work in progress\n")?;
        repo.git(&["stash", "push", "-q", "-m", "wip"])?;

        let snapshot = snapshot(&repo)?;
        assert_eq!(snapshot["stashes"][0]["selector"], "stash@{0}");
        assert!(snapshot["commits"]
            .as_array()
            .into_iter()
            .flatten()
            .any(|c| c["decorations"]
                .as_array()
                .is_some_and(|d| d.iter().any(|x| x == "refs/stash"))));
        Ok(())
    }

    #[test]
    fn test_snapshot_during_conflicted_merge() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        repo.git(&["checkout", "-q", "-b", "other"])?;
        repo.commit_file("initial.txt", "theirs\n", "Theirs")?;
        repo.git(&["checkout", "-q", "main"])?;
        repo.commit_file("initial.txt", "ours\n", "Ours")?;
        assert!(repo.git(&["merge", "other"]).is_err());

        let snapshot = snapshot(&repo)?;
        assert_eq!(snapshot["is_merging"], true);
        assert_eq!(snapshot["has_conflicts"], true);
        assert_eq!(snapshot["conflicted_files"][0], "initial.txt");
        Ok(())
    }

    #[test]
    fn test_snapshot_of_empty_repository() -> anyhow::Result<()> {
        let repo = setup_test_repo()?;

        let snapshot = snapshot(&repo)?;
        assert!(snapshot["head"].is_null());
        assert_eq!(snapshot["commits"], serde_json::json!([]));
        assert_eq!(snapshot["branch_tree"]["remote"]["children"], serde_json::json!([]));
        Ok(())
    }

    #[test]
    fn test_detached_head() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        repo.commit_file("b.txt", "b\n", "Second")?;
        repo.git(&["checkout", "-q", "--detach", "HEAD~1"])?;

        let snapshot = snapshot(&repo)?;
        assert!(snapshot["current_branch"].is_null());
        assert!(snapshot["head"].is_string());
        Ok(())
    }
}
