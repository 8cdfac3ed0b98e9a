//! Restore gate: HeadState, Existence, Occupancy.

use super::{DenialReason, SafetyVerdict};
use crate::error::Result;
use crate::provider::RepositoryQuery;

/// A request to move a branch back to a backup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreRequest {
    /// Branch to restore. `None` means the branch checked out in the active worktree.
    pub branch: Option<String>,
    /// Backup branch to restore from. `None` means the newest backup of `branch`.
    pub backup: Option<String>,
    /// Skip the working-tree-clean check.
    pub force: bool,
    /// Delete the backup branch once the restore succeeds.
    pub delete_backup_after: bool,
}

/// The branch a restore may move, handed out only by [`check_restore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreTarget {
    branch: String,
    checked_out_here: bool,
}

impl RestoreTarget {
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Whether the branch is checked out in the active worktree, so moving it
    /// means a hard reset rather than a ref update.
    pub fn checked_out_here(&self) -> bool {
        self.checked_out_here
    }
}

/// Decide whether the branch named by `request` may be restored.
///
/// Provider failures come back as `Err`; every refusal is a `Denied` value.
pub fn check_restore<Q: RepositoryQuery + ?Sized>(
    repo: &Q,
    request: &RestoreRequest,
) -> Result<SafetyVerdict<RestoreTarget>> {
    let current = repo.current_branch()?;

    let branch = match (&request.branch, &current) {
        (Some(branch), _) => branch.clone(),
        (None, Some(current)) => current.clone(),
        (None, None) => return Ok(SafetyVerdict::Denied(DenialReason::DetachedHead)),
    };

    if !repo.branch_exists(&branch)? {
        return Ok(SafetyVerdict::Denied(DenialReason::BranchNotFound(branch)));
    }

    if current.as_deref() == Some(branch.as_str()) {
        let root = repo.worktree_root();
        if !request.force && repo.has_uncommitted_changes(root)? {
            return Ok(SafetyVerdict::Denied(DenialReason::UncommittedChanges(
                root.to_path_buf(),
            )));
        }
        return Ok(SafetyVerdict::Allowed(RestoreTarget {
            branch,
            checked_out_here: true,
        }));
    }

    if let Some(worktree) = repo.find_worktree_checking_out_branch(&branch)? {
        return Ok(SafetyVerdict::Denied(DenialReason::CheckedOutElsewhere(
            worktree.path,
        )));
    }

    Ok(SafetyVerdict::Allowed(RestoreTarget {
        branch,
        checked_out_here: false,
    }))
}
