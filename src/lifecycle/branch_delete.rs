//! Deleting branches, optionally together with their worktrees.

use crate::batch::{BatchResult, run_batch};
use crate::error::{ArborError, Result};
use crate::provider::{RepositoryMutation, RepositoryQuery};
use crate::safety::{DeleteRequest, check_delete};

/// Delete each requested branch independently.
///
/// Every item passes through the delete gate first; a denial fails that item
/// only. When the gate hands back a worktree, it is removed before the branch,
/// and once the gate has passed the branch deletion itself is not re-checked.
pub fn delete_branches<R>(repo: &R, requests: &[DeleteRequest]) -> BatchResult
where
    R: RepositoryQuery + RepositoryMutation + ?Sized,
{
    run_batch(
        requests,
        |request| request.branch.clone(),
        |request| delete_one(repo, request),
    )
}

fn delete_one<R>(repo: &R, request: &DeleteRequest) -> Result<()>
where
    R: RepositoryQuery + RepositoryMutation + ?Sized,
{
    let target = check_delete(repo, request)?.into_result()?;

    if let Some(worktree) = target.worktree() {
        repo.remove_worktree(worktree, request.force).map_err(|e| {
            ArborError::GitError(format!(
                "Failed to remove worktree '{}': {}",
                worktree.display(),
                e
            ))
        })?;
    }

    // The gate already measured the merge against the requested target; git's
    // own check would use the upstream instead and could refuse after the
    // worktree is gone.
    repo.delete_branch(target.branch(), true).map_err(|e| {
        ArborError::GitError(format!(
            "Failed to delete branch '{}': {}",
            target.branch(),
            e
        ))
    })
}
