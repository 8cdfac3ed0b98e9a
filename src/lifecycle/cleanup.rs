//! Stale worktree cleanup: plan, then remove a chosen subset.

use crate::batch::{BatchResult, run_batch_with_followup};
use crate::error::{ArborError, Result};
use crate::provider::{RepositoryMutation, RepositoryQuery};
use crate::safety::{DeleteRequest, DenialReason, check_delete};
use crate::stale::{Classification, ClassifyOptions, StaleWorktreeInfo};

/// How selected worktrees are removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveOptions {
    /// Remove worktrees with uncommitted changes, and delete unmerged branches.
    pub force: bool,
    /// Also delete each removed worktree's branch.
    pub delete_branch: bool,
    /// Branch the follow-up merge check is measured against.
    pub target_branch: String,
}

/// Classify worktrees for cleanup, fetching first when `options` asks for it.
pub fn plan_cleanup<R>(repo: &R, options: &ClassifyOptions) -> Result<Classification>
where
    R: RepositoryQuery + RepositoryMutation + ?Sized,
{
    let classification = crate::stale::refresh_and_classify(repo, options)?;
    tracing::info!(
        total = classification.worktrees.len(),
        stale = classification.stale().count(),
        target = %options.target_branch,
        "cleanup plan ready"
    );
    Ok(classification)
}

/// Remove each worktree in `selected`, in order.
///
/// A dirty worktree is refused unless `force` is set. With `delete_branch`, the
/// worktree's branch goes through the delete gate after removal; a refusal
/// there is a warning on the item, not a failure.
pub fn remove_worktrees<R>(
    repo: &R,
    selected: &[StaleWorktreeInfo],
    options: &RemoveOptions,
) -> BatchResult
where
    R: RepositoryQuery + RepositoryMutation + ?Sized,
{
    run_batch_with_followup(
        selected,
        |wt| wt.path.display().to_string(),
        |wt| remove_one(repo, wt, options.force),
        |wt| match &wt.branch {
            Some(branch) if options.delete_branch => delete_branch_after(repo, branch, options),
            _ => Ok(()),
        },
    )
}

fn remove_one<R>(repo: &R, worktree: &StaleWorktreeInfo, force: bool) -> Result<()>
where
    R: RepositoryQuery + RepositoryMutation + ?Sized,
{
    // A missing directory has nothing left to lose.
    if !force && !worktree.is_prunable && repo.has_uncommitted_changes(&worktree.path)? {
        return Err(DenialReason::UncommittedChanges(worktree.path.clone()).into());
    }

    repo.remove_worktree(&worktree.path, force).map_err(|e| {
        ArborError::GitError(format!(
            "Failed to remove worktree '{}': {}",
            worktree.path.display(),
            e
        ))
    })
}

fn delete_branch_after<R>(repo: &R, branch: &str, options: &RemoveOptions) -> Result<()>
where
    R: RepositoryQuery + RepositoryMutation + ?Sized,
{
    let request = DeleteRequest {
        branch: branch.to_string(),
        force: options.force,
        remove_worktree: false,
        merge_target: Some(options.target_branch.clone()),
    };
    let target = check_delete(repo, &request)?.into_result()?;
    // The gate already checked the merge against the target branch, which git's
    // own check (against HEAD) would not.
    repo.delete_branch(target.branch(), true)
}
