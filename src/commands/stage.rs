use crate::commands::open_repository;
use crate::core::{
    config::ConfigOverrides,
    error::Result,
    git::{GitRepo, StageOutcome},
    line_selection::LineSelection,
    output::{print_info, print_success},
    patch::PatchDirection,
};

pub fn execute_stage(
    overrides: &ConfigOverrides,
    path: &str,
    hunk: Option<usize>,
    lines: Option<&str>,
) -> Result<()> {
    let repo = open_repository(overrides)?;
    match hunk {
        None => {
            repo.stage_file(path)?;
            print_success(&format!("Staged {path}"));
            Ok(())
        }
        Some(number) => apply(&repo, path, number, lines, PatchDirection::Stage),
    }
}

pub fn execute_unstage(
    overrides: &ConfigOverrides,
    path: &str,
    hunk: Option<usize>,
    lines: Option<&str>,
) -> Result<()> {
    let repo = open_repository(overrides)?;
    match hunk {
        None => {
            repo.unstage_file(path)?;
            print_success(&format!("Unstaged {path}"));
            Ok(())
        }
        Some(number) => apply(&repo, path, number, lines, PatchDirection::Unstage),
    }
}

fn apply(
    repo: &GitRepo,
    path: &str,
    number: usize,
    lines: Option<&str>,
    direction: PatchDirection,
) -> Result<()> {
    let outcome = match lines {
        None => match direction {
            PatchDirection::Stage => repo.stage_hunk(path, number)?,
            PatchDirection::Unstage => repo.unstage_hunk(path, number)?,
        },
        Some(input) => {
            let hunk = repo.select_hunk(path, number, direction)?;
            let selected = LineSelection::resolve(&hunk, input)?;
            repo.apply_selection(path, &hunk, &selected, direction)?
        }
    };

    let verb = match direction {
        PatchDirection::Stage => "Staged",
        PatchDirection::Unstage => "Unstaged",
    };
    match outcome {
        StageOutcome::Applied { changes, .. } => {
            let plural = if changes == 1 { "" } else { "s" };
            print_success(&format!("{verb} {changes} line{plural} of hunk {number} in {path}"));
        }
        StageOutcome::NothingToApply => print_info("Selection contains no changes; nothing applied"),
    }
    Ok(())
}
