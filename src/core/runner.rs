//! The boundary to the external git executable.
//!
//! Everything git-atlas knows about a repository comes through a [`CommandRunner`].
//! The production implementation, [`GitCli`], spawns the configured git binary with a
//! pinned locale so that every parser downstream sees the same textual grammar no
//! matter how the host is configured.
//!
//! # Public API
//! - [`CommandRunner`]: trait with `run`, `run_fail_soft` and `run_with_stdin`
//! - [`CommandOutput`]: captured stdout/stderr and exit status
//! - [`GitCli`]: process-spawning runner
//! - [`GitEnvironment`]: the injected locale configuration

use crate::core::error::{GitAtlasError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Output captured from one external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` when the process was killed by a signal
    pub status: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Successful output with the given stdout, mostly useful for scripted runners
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            status: Some(0),
        }
    }

    /// Failed output with the given stderr and exit code
    pub fn failed(status: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            status: Some(status),
        }
    }
}

/// Locale settings passed to every git invocation.
///
/// The defaults pin both collation and language to `C`; this is what keeps
/// dates, ref ordering and messages stable across hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitEnvironment {
    pub collation: String,
    pub language: String,
}

impl Default for GitEnvironment {
    fn default() -> Self {
        Self {
            collation: "C".to_string(),
            language: "C".to_string(),
        }
    }
}

impl GitEnvironment {
    /// Environment variables applied to the child process
    pub fn vars(&self) -> Vec<(&'static str, String)> {
        vec![
            ("LC_ALL", self.language.clone()),
            ("LC_COLLATE", self.collation.clone()),
            ("LANG", self.language.clone()),
            ("LANGUAGE", self.language.clone()),
            ("GIT_TERMINAL_PROMPT", "0".to_string()),
            ("GIT_OPTIONAL_LOCKS", "0".to_string()),
        ]
    }
}

/// Executes git with arguments in a working directory.
///
/// Implementors only provide [`CommandRunner::execute`], which never treats a
/// non-zero exit as an error. The provided methods layer the strict and
/// stdin-feeding variants on top of it.
pub trait CommandRunner: Send + Sync {
    /// Run the command, feeding `stdin` when given. Only spawn failures are errors.
    fn execute(&self, args: &[&str], cwd: &Path, stdin: Option<&str>) -> Result<CommandOutput>;

    /// Run and require a zero exit status
    fn run(&self, args: &[&str], cwd: &Path) -> Result<CommandOutput> {
        let output = self.execute(args, cwd, None)?;
        ensure_success(args, output)
    }

    /// Run and hand back the output whatever the exit status
    fn run_fail_soft(&self, args: &[&str], cwd: &Path) -> Result<CommandOutput> {
        self.execute(args, cwd, None)
    }

    /// Run with `input` on standard input and require a zero exit status
    fn run_with_stdin(&self, args: &[&str], cwd: &Path, input: &str) -> Result<CommandOutput> {
        let output = self.execute(args, cwd, Some(input))?;
        ensure_success(args, output)
    }
}

/// Render an argument list the way a user would type it
pub fn render_command(args: &[&str]) -> String {
    let mut rendered = String::from("git");
    for arg in args {
        rendered.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            rendered.push('\'');
            rendered.push_str(&arg.escape_debug().to_string());
            rendered.push('\'');
        } else {
            rendered.push_str(&arg.escape_debug().to_string());
        }
    }
    rendered
}

fn ensure_success(args: &[&str], output: CommandOutput) -> Result<CommandOutput> {
    if output.success() {
        Ok(output)
    } else {
        Err(GitAtlasError::command_failed(
            render_command(args),
            output.status,
            &output.stderr,
            &output.stdout,
        ))
    }
}

/// Runner that spawns the git executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    binary: String,
    environment: GitEnvironment,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            environment: GitEnvironment::default(),
        }
    }

    pub fn with_environment(mut self, environment: GitEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn environment(&self) -> &GitEnvironment {
        &self.environment
    }
}

impl CommandRunner for GitCli {
    fn execute(&self, args: &[&str], cwd: &Path, stdin: Option<&str>) -> Result<CommandOutput> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args).current_dir(cwd);
        for (key, value) in self.environment.vars() {
            cmd.env(key, value);
        }
        cmd.stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        log::trace!("running `{}` in {}", render_command(args), cwd.display());

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound && cwd.is_dir() {
                GitAtlasError::git_not_available(&self.binary, e)
            } else {
                GitAtlasError::Io(e)
            }
        })?;

        if let Some(input) = stdin {
            if let Some(mut pipe) = child.stdin.take() {
                // A broken pipe here surfaces as the command's own failure below.
                if let Err(e) = pipe.write_all(input.as_bytes()) {
                    log::debug!("writing stdin for `{}` failed: {e}", render_command(args));
                }
            }
        }

        let output = child.wait_with_output()?;
        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status.code(),
        };

        if !result.success() {
            log::debug!(
                "`{}` exited with {:?}: {}",
                render_command(args),
                result.status,
                result.stderr.trim()
            );
        }
        Ok(result)
    }
}


#[cfg(test)]
mod tests {
    use super::scripted::ScriptedRunner;
    use super::*;

    #[test]
    fn test_default_environment_is_pinned_to_c() {
        let env = GitEnvironment::default();
        let vars = env.vars();
        assert!(vars.contains(&("LC_ALL", "C".to_string())));
        assert!(vars.contains(&("LC_COLLATE", "C".to_string())));
        assert!(vars.contains(&("GIT_TERMINAL_PROMPT", "0".to_string())));
    }

    #[test]
    fn test_render_command_quotes_whitespace() {
        assert_eq!(
            render_command(&["commit", "-m", "two words"]),
            "git commit -m 'two words'"
        );
        assert_eq!(render_command(&["status"]), "git status");
    }

    #[test]
    fn test_run_surfaces_failure_with_command() {
        let runner = ScriptedRunner::new().on(
            &["rev-parse"],
            CommandOutput::failed(128, "fatal: not a git repository"),
        );
        let err = runner
            .run(&["rev-parse", "HEAD"], Path::new("."))
            .unwrap_err();
        match err {
            GitAtlasError::CommandFailed {
                command,
                status,
                message,
            } => {
                assert_eq!(command, "git rev-parse HEAD");
                assert_eq!(status, Some(128));
                assert_eq!(message, "fatal: not a git repository");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_run_fail_soft_returns_status() -> Result<()> {
        let runner = ScriptedRunner::new().on(
            &["rev-parse", "--verify"],
            CommandOutput::failed(1, ""),
        );
        let output = runner.run_fail_soft(&["rev-parse", "--verify", "MERGE_HEAD"], Path::new("."))?;
        assert!(!output.success());
        assert_eq!(output.status, Some(1));
        Ok(())
    }

    #[test]
    fn test_run_with_stdin_records_input() -> Result<()> {
        let runner = ScriptedRunner::new().on(&["apply"], CommandOutput::ok(""));
        runner.run_with_stdin(&["apply", "--cached", "-"], Path::new("."), "patch")?;
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1.as_deref(), Some("patch"));
        Ok(())
    }

    #[test]
    fn test_missing_binary_is_reported() {
        let cli = GitCli::new("git-atlas-no-such-binary");
        let err = cli
            .run(&["status"], &std::env::temp_dir())
            .unwrap_err();
        assert!(matches!(err, GitAtlasError::GitNotAvailable { .. }));
    }
}
