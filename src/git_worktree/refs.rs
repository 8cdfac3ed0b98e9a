//! HEAD and ref resolution.

use crate::error::{ArborError, Result};
use crate::git::run_git;
use std::path::Path;

/// Get the branch checked out in `worktree_path`.
///
/// Returns `None` for a detached HEAD.
pub fn current_branch<P: AsRef<Path>>(worktree_path: P) -> Result<Option<String>> {
    let output = run_git(worktree_path, &["rev-parse", "--abbrev-ref", "HEAD"])?;
    if output.stdout == "HEAD" {
        Ok(None)
    } else {
        Ok(Some(output.stdout))
    }
}

/// Resolve `reference` to a full commit hash.
pub fn commit_hash_of<P: AsRef<Path>>(repo_root: P, reference: &str) -> Result<String> {
    let rev = format!("{}^{{commit}}", reference);
    let output = run_git(repo_root, &["rev-parse", "--verify", &rev]).map_err(|e| {
        ArborError::GitError(format!("failed to resolve '{}': {}", reference, e))
    })?;
    Ok(output.stdout)
}
