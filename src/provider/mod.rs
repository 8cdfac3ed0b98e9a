//! Provider interfaces the lifecycle engine consumes.
//!
//! The engine never shells out itself. It asks a [`RepositoryQuery`] about state,
//! asks a [`RepositoryMutation`] to change it, reads history through a
//! [`HistoryQuery`], and leaves prompting to a [`Confirmation`]. The production
//! implementation of the first three is [`GitRepository`].

mod git_cli;

pub use git_cli::GitRepository;

use crate::delta::CommitDelta;
use crate::error::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A worktree as reported by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorktreeInfo {
    /// Absolute path to the worktree directory.
    pub path: PathBuf,
    /// Checked-out branch, `None` for a detached HEAD.
    pub branch: Option<String>,
    /// HEAD commit.
    pub head: String,
    /// Whether this is the primary worktree.
    pub is_main: bool,
    /// Whether git considers the worktree prunable (directory missing or invalid).
    pub prunable: bool,
}

/// Read-only repository state.
pub trait RepositoryQuery {
    /// Root of the worktree the engine is operating from.
    fn worktree_root(&self) -> &Path;

    fn is_repository(&self) -> bool;

    /// Branch checked out in the active worktree, `None` when HEAD is detached.
    fn current_branch(&self) -> Result<Option<String>>;

    fn branch_exists(&self, name: &str) -> Result<bool>;

    fn commit_hash_of(&self, reference: &str) -> Result<String>;

    /// True if every commit of `branch` is reachable from `target`.
    fn is_branch_merged(&self, branch: &str, target: &str) -> Result<bool>;

    fn has_uncommitted_changes(&self, path: &Path) -> Result<bool>;

    fn find_worktree_checking_out_branch(&self, branch: &str) -> Result<Option<WorktreeInfo>>;

    fn list_worktrees(&self) -> Result<Vec<WorktreeInfo>>;

    /// True if `branch` tracks an upstream that no longer exists.
    fn upstream_gone(&self, branch: &str) -> Result<bool>;

    /// Local branches whose names start with `prefix`.
    fn list_branches(&self, prefix: &str) -> Result<Vec<String>>;

    fn branch_description(&self, name: &str) -> Result<Option<String>>;
}

/// Repository mutations. Callers must hold an `Allowed` verdict before using these.
pub trait RepositoryMutation {
    fn create_branch(&self, name: &str, from_ref: &str) -> Result<()>;

    /// Move a branch that is not checked out in the active worktree.
    fn force_update_branch(&self, name: &str, to_commit: &str) -> Result<()>;

    /// Hard-reset the branch checked out in the active worktree.
    fn reset_hard_current_branch(&self, to_commit: &str) -> Result<()>;

    /// Delete a branch. Without `force`, an unmerged branch yields a `NotMerged` denial.
    fn delete_branch(&self, name: &str, force: bool) -> Result<()>;

    fn remove_worktree(&self, path: &Path, force: bool) -> Result<()>;

    fn set_branch_description(&self, name: &str, text: &str) -> Result<()>;

    fn delete_branch_description(&self, name: &str) -> Result<()>;

    /// Refresh remote-tracking refs, dropping ones deleted upstream.
    fn fetch_prune(&self, remote: &str) -> Result<()>;
}

/// Read-only commit history.
pub trait HistoryQuery {
    /// Commits reachable from `reference` but not `excluding`, capped at `limit`,
    /// with the uncapped total.
    fn commits_reachable_only_from(
        &self,
        reference: &str,
        excluding: &str,
        limit: usize,
    ) -> Result<CommitDelta>;
}

/// Human-in-the-loop decisions, resolved before any mutation starts.
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> Result<bool>;

    /// Returns the indices of the chosen entries.
    fn select_many(&self, prompt: &str, choices: &[String]) -> Result<Vec<usize>>;
}

/// Everything the lifecycle operations need from a repository.
pub trait Repository: RepositoryQuery + RepositoryMutation + HistoryQuery {}

impl<T: RepositoryQuery + RepositoryMutation + HistoryQuery> Repository for T {}
