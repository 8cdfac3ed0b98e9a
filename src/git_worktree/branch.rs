//! Branch operations (create, check existence, move, delete, descriptions).

use crate::error::{ArborError, Result};
use crate::git::run_git;
use crate::safety::DenialReason;
use std::path::Path;

/// Check if a branch exists locally.
pub fn branch_exists<P: AsRef<Path>>(repo_root: P, branch: &str) -> Result<bool> {
    let output = run_git(
        repo_root,
        &["rev-parse", "--verify", "--quiet", &format!("refs/heads/{}", branch)],
    );
    Ok(output.is_ok())
}

/// List local branch names under `prefix` (e.g. `backup/`).
pub fn list_branches<P: AsRef<Path>>(repo_root: P, prefix: &str) -> Result<Vec<String>> {
    let pattern = format!("refs/heads/{}", prefix);
    let output = run_git(
        repo_root,
        &["for-each-ref", "--format=%(refname:short)", &pattern],
    )?;
    Ok(output.lines().into_iter().map(String::from).collect())
}

/// Create a new branch at `from_ref`.
pub fn create_branch<P: AsRef<Path>>(repo_root: P, branch: &str, from_ref: &str) -> Result<()> {
    run_git(repo_root, &["branch", branch, from_ref]).map_err(|e| {
        ArborError::GitError(format!(
            "failed to create branch '{}' at {}: {}",
            branch, from_ref, e
        ))
    })?;
    Ok(())
}

/// Point an existing branch that is not checked out at `commit`.
///
/// Uses `git branch -f`, which git refuses for a branch checked out in any worktree.
pub fn force_update_branch<P: AsRef<Path>>(repo_root: P, branch: &str, commit: &str) -> Result<()> {
    run_git(repo_root, &["branch", "-f", branch, commit]).map_err(|e| {
        ArborError::GitError(format!(
            "failed to move branch '{}' to {}: {}",
            branch, commit, e
        ))
    })?;
    Ok(())
}

/// Hard-reset the branch checked out in `worktree` to `commit`.
pub fn reset_hard<P: AsRef<Path>>(worktree: P, commit: &str) -> Result<()> {
    run_git(worktree, &["reset", "--hard", commit]).map_err(|e| {
        ArborError::GitError(format!("failed to reset to {}: {}", commit, e))
    })?;
    Ok(())
}

/// Delete a branch.
///
/// Uses `git branch -d` unless `force` is set. Git's "not fully merged" refusal
/// is the only stderr this function interprets: it becomes a `NotMerged` denial
/// so callers see the same outcome as the pre-flight merge check.
pub fn delete_branch<P: AsRef<Path>>(repo_root: P, branch: &str, force: bool) -> Result<()> {
    let delete_flag = if force { "-D" } else { "-d" };

    match run_git(repo_root, &["branch", delete_flag, branch]) {
        Ok(_) => Ok(()),
        Err(ArborError::GitError(msg)) if !force && msg.contains("not fully merged") => Err(
            ArborError::SafetyDenied(DenialReason::NotMerged(branch.to_string())),
        ),
        Err(e) => Err(ArborError::GitError(format!(
            "failed to delete branch '{}': {}",
            branch, e
        ))),
    }
}

/// Returns true if every commit of `branch` is reachable from `target`.
pub fn is_branch_merged<P: AsRef<Path>>(repo_root: P, branch: &str, target: &str) -> Result<bool> {
    let merged_arg = format!("--merged={}", target);
    let output = run_git(
        repo_root,
        &["for-each-ref", &merged_arg, "--format=%(refname:short)", "refs/heads/"],
    )?;
    Ok(output.lines().contains(&branch))
}

fn description_key(branch: &str) -> String {
    format!("branch.{}.description", branch)
}

/// Read a branch description, if one is set.
pub fn branch_description<P: AsRef<Path>>(repo_root: P, branch: &str) -> Result<Option<String>> {
    // `--default ""` makes a missing key exit 0 with empty output, so any
    // failure left is a real one.
    let key = description_key(branch);
    let output = run_git(repo_root, &["config", "--default", "", "--get", &key]).map_err(|e| {
        ArborError::GitError(format!(
            "failed to read description for branch '{}': {}",
            branch, e
        ))
    })?;

    if output.is_empty() {
        Ok(None)
    } else {
        Ok(Some(output.stdout))
    }
}

/// Store `text` as the branch description.
pub fn set_branch_description<P: AsRef<Path>>(repo_root: P, branch: &str, text: &str) -> Result<()> {
    run_git(repo_root, &["config", &description_key(branch), text]).map_err(|e| {
        ArborError::GitError(format!(
            "failed to set description for branch '{}': {}",
            branch, e
        ))
    })?;
    Ok(())
}

/// Remove a branch description. Missing descriptions are not an error.
pub fn delete_branch_description<P: AsRef<Path>>(repo_root: P, branch: &str) -> Result<()> {
    let repo_root = repo_root.as_ref();
    if branch_description(repo_root, branch)?.is_none() {
        return Ok(());
    }

    run_git(repo_root, &["config", "--unset", &description_key(branch)]).map_err(|e| {
        ArborError::GitError(format!(
            "failed to remove description for branch '{}': {}",
            branch, e
        ))
    })?;
    Ok(())
}
