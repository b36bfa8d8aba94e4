//! External command execution for composer, diff, and patch
//!
//! This module provides:
//! - A capture type for external command results
//! - A runner trait so tests can substitute fakes
//! - Helpers for the composer invocations the subcommands share

use crate::error::CommandError;
use std::path::Path;
use std::process::Command;

/// Captured result of an external command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Program that was executed
    pub program: String,
    /// Arguments it was given
    pub args: Vec<String>,
    /// Exit status code (-1 when terminated by a signal)
    pub status: i32,
    /// Standard output from the command
    pub stdout: String,
    /// Standard error from the command
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the command exited successfully
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// The full command line, for reporting
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// stderr if non-empty, else stdout - composer mixes its channels
    pub fn failure_detail(&self) -> &str {
        if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Trait for running external commands
pub trait CommandRunner {
    /// Run a program in the given directory and capture its output.
    /// A non-zero exit is not an error here; callers inspect the status.
    fn run(
        &self,
        program: &str,
        args: &[&str],
        working_dir: &Path,
    ) -> Result<CommandOutput, CommandError>;
}

/// Default runner that executes real commands
#[derive(Debug, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    /// Create a new system command runner
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        working_dir: &Path,
    ) -> Result<CommandOutput, CommandError> {
        let output = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .output()
            .map_err(|e| CommandError::spawn_failed(program, e))?;

        Ok(CommandOutput {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Install an exact package version with full dependency resolution
pub fn composer_require(
    runner: &dyn CommandRunner,
    working_dir: &Path,
    package: &str,
    version: &str,
) -> Result<CommandOutput, CommandError> {
    let requirement = format!("{}:{}", package, version);
    runner.run(
        "composer",
        &[
            "require",
            &requirement,
            "--with-all-dependencies",
            "--no-interaction",
        ],
        working_dir,
    )
}

/// Probe whether a requirement would resolve, without touching anything
pub fn composer_require_dry_run(
    runner: &dyn CommandRunner,
    working_dir: &Path,
    requirement: &str,
) -> Result<CommandOutput, CommandError> {
    runner.run(
        "composer",
        &["require", requirement, "--dry-run", "--no-interaction"],
        working_dir,
    )
}
