//! Remote tracking: fetch-with-prune and upstream status.

use crate::error::{ArborError, Result};
use crate::git::run_git;
use std::path::Path;

/// Fetch `remote` and prune remote-tracking refs that no longer exist upstream.
pub fn fetch_prune<P: AsRef<Path>>(repo_root: P, remote: &str) -> Result<()> {
    let repo_root = repo_root.as_ref();

    let remotes = run_git(repo_root, &["remote"])?;
    if !remotes.lines().contains(&remote) {
        return Err(ArborError::GitError(format!(
            "remote '{}' does not exist.\n\n\
             Add it with: git remote add {} <url>",
            remote, remote
        )));
    }

    run_git(repo_root, &["fetch", "--prune", remote]).map_err(|e| {
        ArborError::GitError(format!("failed to fetch '{}': {}", remote, e))
    })?;

    Ok(())
}

/// Returns true if `branch` tracks an upstream that no longer exists.
///
/// A branch without upstream configuration is never "gone".
pub fn upstream_gone<P: AsRef<Path>>(repo_root: P, branch: &str) -> Result<bool> {
    let refname = format!("refs/heads/{}", branch);
    let output = run_git(
        repo_root,
        &["for-each-ref", "--format=%(upstream)|%(upstream:track)", &refname],
    )?;

    let Some((upstream, track)) = output.stdout.split_once('|') else {
        return Ok(false);
    };
    Ok(!upstream.is_empty() && track.contains("gone"))
}
