//! Git CLI implementation of the provider traits.

use super::{HistoryQuery, RepositoryMutation, RepositoryQuery, WorktreeInfo};
use crate::delta::CommitDelta;
use crate::error::Result;
use crate::git;
use crate::git_worktree;
use std::path::{Path, PathBuf};

/// A repository accessed through `git` subprocesses, rooted at one worktree.
#[derive(Debug, Clone)]
pub struct GitRepository {
    root: PathBuf,
}

impl GitRepository {
    /// Open the repository containing `cwd`.
    ///
    /// # Returns
    ///
    /// * `Ok(GitRepository)` - Rooted at the worktree top-level containing `cwd`
    /// * `Err(ArborError::UserError)` - If `cwd` is not inside a git repository
    pub fn discover<P: AsRef<Path>>(cwd: P) -> Result<Self> {
        let root = git::get_repo_root(cwd)?;
        Ok(Self { root })
    }

    /// Use `root` as-is without discovery.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RepositoryQuery for GitRepository {
    fn worktree_root(&self) -> &Path {
        &self.root
    }

    fn is_repository(&self) -> bool {
        git::is_repository(&self.root)
    }

    fn current_branch(&self) -> Result<Option<String>> {
        git_worktree::current_branch(&self.root)
    }

    fn branch_exists(&self, name: &str) -> Result<bool> {
        git_worktree::branch_exists(&self.root, name)
    }

    fn commit_hash_of(&self, reference: &str) -> Result<String> {
        git_worktree::commit_hash_of(&self.root, reference)
    }

    fn is_branch_merged(&self, branch: &str, target: &str) -> Result<bool> {
        git_worktree::is_branch_merged(&self.root, branch, target)
    }

    fn has_uncommitted_changes(&self, path: &Path) -> Result<bool> {
        git::has_uncommitted_changes(path)
    }

    fn find_worktree_checking_out_branch(&self, branch: &str) -> Result<Option<WorktreeInfo>> {
        git_worktree::find_worktree_for_branch(&self.root, branch)
    }

    fn list_worktrees(&self) -> Result<Vec<WorktreeInfo>> {
        git_worktree::list_worktrees(&self.root)
    }

    fn upstream_gone(&self, branch: &str) -> Result<bool> {
        git_worktree::upstream_gone(&self.root, branch)
    }

    fn list_branches(&self, prefix: &str) -> Result<Vec<String>> {
        git_worktree::list_branches(&self.root, prefix)
    }

    fn branch_description(&self, name: &str) -> Result<Option<String>> {
        git_worktree::branch_description(&self.root, name)
    }
}

impl RepositoryMutation for GitRepository {
    fn create_branch(&self, name: &str, from_ref: &str) -> Result<()> {
        tracing::info!(branch = name, from = from_ref, "creating branch");
        git_worktree::create_branch(&self.root, name, from_ref)
    }

    fn force_update_branch(&self, name: &str, to_commit: &str) -> Result<()> {
        tracing::info!(branch = name, commit = to_commit, "force-updating branch");
        git_worktree::force_update_branch(&self.root, name, to_commit)
    }

    fn reset_hard_current_branch(&self, to_commit: &str) -> Result<()> {
        tracing::info!(commit = to_commit, "hard-resetting current branch");
        git_worktree::reset_hard(&self.root, to_commit)
    }

    fn delete_branch(&self, name: &str, force: bool) -> Result<()> {
        tracing::info!(branch = name, force, "deleting branch");
        git_worktree::delete_branch(&self.root, name, force)
    }

    fn remove_worktree(&self, path: &Path, force: bool) -> Result<()> {
        tracing::info!(path = %path.display(), force, "removing worktree");
        git_worktree::remove_worktree(&self.root, path, force)
    }

    fn set_branch_description(&self, name: &str, text: &str) -> Result<()> {
        git_worktree::set_branch_description(&self.root, name, text)
    }

    fn delete_branch_description(&self, name: &str) -> Result<()> {
        git_worktree::delete_branch_description(&self.root, name)
    }

    fn fetch_prune(&self, remote: &str) -> Result<()> {
        tracing::info!(remote, "fetching with prune");
        git_worktree::fetch_prune(&self.root, remote)
    }
}

impl HistoryQuery for GitRepository {
    fn commits_reachable_only_from(
        &self,
        reference: &str,
        excluding: &str,
        limit: usize,
    ) -> Result<CommitDelta> {
        git_worktree::commits_reachable_only_from(&self.root, reference, excluding, limit)
    }
}
