use clap::{Parser, Subcommand};
use git_atlas::commands::*;
use git_atlas::core::{
    config::ConfigOverrides,
    error::{GitAtlasError, Result},
    git::DEFAULT_REFLOG_LIMIT,
    output::print_error,
};
use std::env;

#[derive(Parser)]
#[command(name = "git-atlas")]
#[command(about = "Commit graph, branch tree and partial staging for git repositories")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Maximum number of commits to walk
    #[arg(long, global = true)]
    max_commits: Option<usize>,

    /// Do not infer branch parents from naming conventions
    #[arg(long, global = true)]
    no_infer: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show numbered working tree status
    Status,
    /// Draw the commit graph
    Graph {
        /// Number of commits to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Print the laid-out commits as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the branch tree
    Branches {
        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the hunks of a file with numbered change lines
    Diff {
        path: String,
        /// Show the staged changes instead of the worktree changes
        #[arg(long, alias = "cached")]
        staged: bool,
    },
    /// Stage a file, one hunk of it, or selected lines of a hunk
    Stage {
        path: String,
        /// Hunk number as shown by `diff`
        #[arg(long)]
        hunk: Option<usize>,
        /// Change lines of the hunk (e.g., "1 3-5,8")
        #[arg(long, requires = "hunk")]
        lines: Option<String>,
    },
    /// Unstage a file, one hunk of it, or selected lines of a hunk
    Unstage {
        path: String,
        /// Hunk number as shown by `diff --staged`
        #[arg(long)]
        hunk: Option<usize>,
        /// Change lines of the hunk (e.g., "1 3-5,8")
        #[arg(long, requires = "hunk")]
        lines: Option<String>,
    },
    /// Show who last changed each line of a file
    Blame { path: String },
    /// Show recent reflog entries
    Reflog {
        #[arg(short = 'n', long, default_value_t = DEFAULT_REFLOG_LIMIT)]
        limit: usize,
    },
    /// List worktrees
    Worktrees,
    /// Show one commit with its changed files
    Show { hash: String },
    /// Print the full repository snapshot as JSON
    Snapshot,
}

fn report(result: Result<()>) {
    if let Err(e) = result {
        if let GitAtlasError::NotInGitRepo = e {
            print_error("Not in a git repository");
        } else {
            print_error(&e.to_string());
        }
        std::process::exit(1);
    }
}

fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let mut overrides = ConfigOverrides {
        max_commits: cli.max_commits,
        no_infer: cli.no_infer,
    };

    match cli.command {
        Commands::Status => report(execute_status(&overrides)),
        Commands::Graph { limit, json } => {
            if limit.is_some() {
                overrides.max_commits = limit;
            }
            report(execute_graph(&overrides, json))
        }
        Commands::Branches { json } => report(execute_branches(&overrides, json)),
        Commands::Diff { path, staged } => report(execute_diff(&overrides, &path, staged)),
        Commands::Stage { path, hunk, lines } => {
            report(execute_stage(&overrides, &path, hunk, lines.as_deref()))
        }
        Commands::Unstage { path, hunk, lines } => {
            report(execute_unstage(&overrides, &path, hunk, lines.as_deref()))
        }
        Commands::Blame { path } => report(execute_blame(&overrides, &path)),
        Commands::Reflog { limit } => report(execute_reflog(&overrides, limit)),
        Commands::Worktrees => report(execute_worktrees(&overrides)),
        Commands::Show { hash } => report(execute_show(&overrides, &hash)),
        Commands::Snapshot => report(execute_snapshot(&overrides)),
    }
}
