//! Git command runner for arbor.
//!
//! Every git subprocess goes through [`run_git`], which captures stdout/stderr
//! and turns non-zero exits into `ArborError::GitError` carrying git's own message.

use crate::error::{ArborError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Captured output of a successful git command.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output (trimmed).
    pub stdout: String,
    /// Standard error (trimmed).
    pub stderr: String,
}

impl GitOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// Returns true if stdout is empty.
    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty()
    }

    /// Returns stdout lines, or nothing when stdout is empty.
    pub fn lines(&self) -> Vec<&str> {
        if self.stdout.is_empty() {
            Vec::new()
        } else {
            self.stdout.lines().collect()
        }
    }
}

/// Run a git command in `cwd`.
///
/// # Returns
///
/// * `Ok(GitOutput)` - The command exited with status 0
/// * `Err(ArborError::GitError)` - Spawn failure or non-zero exit
pub fn run_git<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<GitOutput> {
    let cwd = cwd.as_ref();
    tracing::debug!(cwd = %cwd.display(), "git {}", args.join(" "));

    let output = Command::new("git")
        .current_dir(cwd)
        .args(args)
        .output()
        .map_err(|e| {
            ArborError::GitError(format!(
                "failed to execute git {}: {}",
                args.first().unwrap_or(&""),
                e
            ))
        })?;

    let git_output = GitOutput::from_output(&output);

    if output.status.success() {
        Ok(git_output)
    } else {
        let exit_code = output.status.code().unwrap_or(-1);
        let error_msg = if git_output.stderr.is_empty() {
            git_output.stdout.clone()
        } else {
            git_output.stderr.clone()
        };

        Err(ArborError::GitError(format!(
            "git {} failed (exit code {}): {}",
            args.first().unwrap_or(&""),
            exit_code,
            error_msg
        )))
    }
}

/// Get the top-level directory of the worktree containing `cwd`.
///
/// "Not a git repository" is reported as a `UserError` rather than a git failure
/// so the CLI exits with the user-error code.
pub fn get_repo_root<P: AsRef<Path>>(cwd: P) -> Result<PathBuf> {
    let cwd = cwd.as_ref();

    let output = Command::new("git")
        .current_dir(cwd)
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .map_err(|e| {
            ArborError::UserError(format!("failed to execute git: {} (is git installed?)", e))
        })?;

    let git_output = GitOutput::from_output(&output);
    if output.status.success() {
        return Ok(PathBuf::from(git_output.stdout));
    }

    if git_output.stderr.contains("not a git repository") {
        Err(ArborError::UserError(
            "not inside a git repository. Run this command from within a git repository."
                .to_string(),
        ))
    } else {
        Err(ArborError::UserError(format!(
            "git command failed: {}",
            git_output.stderr
        )))
    }
}

/// Returns true if `cwd` is inside a git work tree.
pub fn is_repository<P: AsRef<Path>>(cwd: P) -> bool {
    run_git(cwd, &["rev-parse", "--is-inside-work-tree"])
        .map(|out| out.stdout == "true")
        .unwrap_or(false)
}

/// Check whether a worktree has uncommitted changes.
///
/// Untracked files count: removing a worktree deletes them, so they are at risk
/// just like staged or unstaged edits.
pub fn has_uncommitted_changes<P: AsRef<Path>>(cwd: P) -> Result<bool> {
    let output = run_git(cwd, &["status", "--porcelain"])?;
    Ok(!output.is_empty())
}
