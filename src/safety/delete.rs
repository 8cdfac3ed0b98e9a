//! Delete gate: Existence, NotCurrent, MergeCheck, WorkingTreeClean.

use super::{DenialReason, SafetyVerdict};
use crate::error::Result;
use crate::provider::RepositoryQuery;
use std::path::{Path, PathBuf};

/// A request to delete a branch, optionally together with its worktree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub branch: String,
    /// Skip the merge check and the working-tree-clean check.
    pub force: bool,
    /// Remove the worktree that has the branch checked out, if there is one.
    pub remove_worktree: bool,
    /// Ref the branch must be merged into. `None` means `HEAD`.
    pub merge_target: Option<String>,
}

impl DeleteRequest {
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            force: false,
            remove_worktree: false,
            merge_target: None,
        }
    }

    fn merge_target(&self) -> &str {
        self.merge_target.as_deref().unwrap_or("HEAD")
    }
}

/// The branch (and worktree) a delete may remove, handed out only by [`check_delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    branch: String,
    worktree: Option<PathBuf>,
}

impl DeleteTarget {
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Worktree to remove before deleting the branch.
    pub fn worktree(&self) -> Option<&Path> {
        self.worktree.as_deref()
    }
}

/// Decide whether the branch named by `request` may be deleted.
pub fn check_delete<Q: RepositoryQuery + ?Sized>(
    repo: &Q,
    request: &DeleteRequest,
) -> Result<SafetyVerdict<DeleteTarget>> {
    let branch = &request.branch;

    if !repo.branch_exists(branch)? {
        return Ok(SafetyVerdict::Denied(DenialReason::BranchNotFound(
            branch.clone(),
        )));
    }

    if repo.current_branch()?.as_deref() == Some(branch.as_str()) {
        return Ok(SafetyVerdict::Denied(DenialReason::CheckedOutElsewhere(
            repo.worktree_root().to_path_buf(),
        )));
    }

    let worktree = repo.find_worktree_checking_out_branch(branch)?;
    if let Some(wt) = &worktree
        && (!request.remove_worktree || wt.is_main)
    {
        return Ok(SafetyVerdict::Denied(DenialReason::CheckedOutElsewhere(
            wt.path.clone(),
        )));
    }

    if !request.force && !repo.is_branch_merged(branch, request.merge_target())? {
        return Ok(SafetyVerdict::Denied(DenialReason::NotMerged(branch.clone())));
    }

    if let Some(wt) = &worktree
        && !request.force
        && !wt.prunable
        && repo.has_uncommitted_changes(&wt.path)?
    {
        return Ok(SafetyVerdict::Denied(DenialReason::UncommittedChanges(
            wt.path.clone(),
        )));
    }

    Ok(SafetyVerdict::Allowed(DeleteTarget {
        branch: branch.clone(),
        worktree: worktree.map(|wt| wt.path),
    }))
}
