//! Restore/delete safety validation.
//!
//! Each check is a gate in a fixed sequence. The first gate that fails yields a
//! `Denied` verdict and nothing after it runs. Validators only query state; an
//! `Allowed` verdict carries a target token that the lifecycle layer needs in
//! order to mutate anything.

mod delete;
mod restore;

pub use delete::{DeleteRequest, DeleteTarget, check_delete};
pub use restore::{RestoreRequest, RestoreTarget, check_restore};

use crate::error::{ArborError, Result};
use std::path::PathBuf;
use thiserror::Error;

/// Why a destructive operation was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DenialReason {
    #[error("HEAD is detached; name the branch explicitly")]
    DetachedHead,

    #[error("Branch '{0}' does not exist")]
    BranchNotFound(String),

    #[error(
        "Worktree at {} has uncommitted changes (commit or stash them, or use --force)",
        .0.display()
    )]
    UncommittedChanges(PathBuf),

    #[error("Branch is checked out in the worktree at {}", .0.display())]
    CheckedOutElsewhere(PathBuf),

    #[error("Branch '{0}' is not fully merged (use --force to delete it anyway)")]
    NotMerged(String),
}

impl DenialReason {
    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DenialReason::DetachedHead => "detached_head",
            DenialReason::BranchNotFound(_) => "branch_not_found",
            DenialReason::UncommittedChanges(_) => "uncommitted_changes",
            DenialReason::CheckedOutElsewhere(_) => "checked_out_elsewhere",
            DenialReason::NotMerged(_) => "not_merged",
        }
    }

    /// The path or branch a caller needs to act on the denial, keyed by name.
    pub fn context(&self) -> Option<(&'static str, String)> {
        match self {
            DenialReason::DetachedHead => None,
            DenialReason::BranchNotFound(branch) | DenialReason::NotMerged(branch) => {
                Some(("branch", branch.clone()))
            }
            DenialReason::UncommittedChanges(path) | DenialReason::CheckedOutElsewhere(path) => {
                Some(("path", path.display().to_string()))
            }
        }
    }
}

/// Outcome of a safety validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SafetyVerdict<T = ()> {
    Allowed(T),
    Denied(DenialReason),
}

impl<T> SafetyVerdict<T> {
    pub fn is_allowed(&self) -> bool {
        matches!(self, SafetyVerdict::Allowed(_))
    }

    pub fn denial(&self) -> Option<&DenialReason> {
        match self {
            SafetyVerdict::Allowed(_) => None,
            SafetyVerdict::Denied(reason) => Some(reason),
        }
    }

    /// Turn a denial into `ArborError::SafetyDenied` at the command boundary.
    pub fn into_result(self) -> Result<T> {
        match self {
            SafetyVerdict::Allowed(target) => Ok(target),
            SafetyVerdict::Denied(reason) => {
                tracing::debug!(kind = reason.kind(), "operation denied: {}", reason);
                Err(ArborError::SafetyDenied(reason))
            }
        }
    }
}
