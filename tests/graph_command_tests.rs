use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;

mod common;
use common::{fixtures::*, repository::*};

fn commit_by_subject<'a>(commits: &'a [Value], subject: &str) -> &'a Value {
    commits
        .iter()
        .find(|c| c["subject"] == subject)
        .unwrap_or_else(|| panic!("commit {subject:?} missing from graph"))
}

#[cfg(test)]
mod graph_command_tests {
    use super::*;

    #[test]
    fn test_graph_lists_commits_with_decorations() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        repo.commit_file("second.txt", "2\n", "Second commit")?;

        repo.atlas()?
            .arg("graph")
            .assert()
            .success()
            .stdout(predicate::str::contains("Second commit"))
            .stdout(predicate::str::contains("Initial commit"))
            .stdout(predicate::str::contains("HEAD, main"))
            .stdout(predicate::str::contains("●"));

        Ok(())
    }

    #[test]
    fn test_graph_json_linear_history_is_one_lane() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        repo.commit_file("b.txt", "b\n", "B")?;
        repo.commit_file("c.txt", "c\n", "C")?;

        let output = repo.atlas()?.args(["graph", "--json"]).output()?;
        assert!(output.status.success());
        let commits: Vec<Value> = serde_json::from_slice(&output.stdout)?;

        assert_eq!(commits.len(), 3);
        for commit in &commits {
            assert_eq!(commit["layout"]["lane"], 0);
            assert_eq!(commit["layout"]["node_color"], 0);
            for edge in commit["layout"]["outgoing_edges"].as_array().into_iter().flatten() {
                assert_eq!(edge["from"], edge["to"]);
            }
        }
        Ok(())
    }

    #[test]
    fn test_graph_json_merge_uses_second_lane() -> anyhow::Result<()> {
        let repo = create_merge_repo()?;

        let output = repo.atlas()?.args(["graph", "--json"]).output()?;
        assert!(output.status.success());
        let commits: Vec<Value> = serde_json::from_slice(&output.stdout)?;
        assert_eq!(commits.len(), 5);

        let merge = commit_by_subject(&commits, "Merge feature/login");
        assert_eq!(commits[0]["subject"], "Merge feature/login");
        assert_eq!(merge["layout"]["lane"], 0);
        assert_eq!(merge["layout"]["node_color"], 0);
        assert_eq!(merge["layout"]["outgoing_edges"].as_array().map(Vec::len), Some(2));

        let side = commit_by_subject(&commits, "Add login");
        assert_ne!(side["layout"]["lane"], 0);
        assert_ne!(side["layout"]["node_color"], 0);

        for subject in ["Third", "Second", "First"] {
            assert_eq!(commit_by_subject(&commits, subject)["layout"]["node_color"], 0);
        }
        assert_eq!(commit_by_subject(&commits, "First")["layout"]["lane"], 0);
        Ok(())
    }

    #[test]
    fn test_graph_limit() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        repo.commit_file("b.txt", "b\n", "B")?;

        let output = repo.atlas()?.args(["graph", "--json", "--limit", "1"]).output()?;
        let commits: Vec<Value> = serde_json::from_slice(&output.stdout)?;
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0]["subject"], "B");
        Ok(())
    }

    #[test]
    fn test_graph_empty_repository() -> anyhow::Result<()> {
        let repo = setup_test_repo()?;

        repo.atlas()?
            .arg("graph")
            .assert()
            .success()
            .stdout(predicate::str::contains("no commits yet"));

        Ok(())
    }
}
