//! Worktree listing and removal.

use crate::error::{ArborError, Result};
use crate::git::run_git;
use crate::provider::WorktreeInfo;
use std::path::{Path, PathBuf};

/// List all worktrees in the repository.
///
/// Parses `git worktree list --porcelain`. The first entry is the main worktree.
/// Bare entries are skipped.
pub fn list_worktrees<P: AsRef<Path>>(repo_root: P) -> Result<Vec<WorktreeInfo>> {
    let output = run_git(repo_root, &["worktree", "list", "--porcelain"])?;
    Ok(parse_worktree_list(&output.stdout))
}

#[derive(Default)]
struct Entry {
    path: Option<PathBuf>,
    head: Option<String>,
    branch: Option<String>,
    bare: bool,
    prunable: bool,
}

impl Entry {
    fn finish(self, is_main: bool) -> Option<WorktreeInfo> {
        if self.bare {
            return None;
        }
        Some(WorktreeInfo {
            path: self.path?,
            branch: self.branch,
            head: self.head.unwrap_or_default(),
            is_main,
            prunable: self.prunable,
        })
    }
}

pub(crate) fn parse_worktree_list(porcelain: &str) -> Vec<WorktreeInfo> {
    let mut worktrees = Vec::new();
    let mut seen = 0usize;
    let mut current: Option<Entry> = None;

    for line in porcelain.lines() {
        if let Some(path) = line.strip_prefix("worktree ") {
            if let Some(entry) = current.take() {
                worktrees.extend(entry.finish(seen == 0));
                seen += 1;
            }
            current = Some(Entry {
                path: Some(PathBuf::from(path)),
                ..Entry::default()
            });
            continue;
        }

        let Some(entry) = current.as_mut() else {
            continue;
        };
        if let Some(sha) = line.strip_prefix("HEAD ") {
            entry.head = Some(sha.to_string());
        } else if let Some(branch_ref) = line.strip_prefix("branch ") {
            entry.branch = branch_ref.strip_prefix("refs/heads/").map(String::from);
        } else if line == "detached" {
            entry.branch = None;
        } else if line == "bare" {
            entry.bare = true;
        } else if line == "prunable" || line.starts_with("prunable ") {
            entry.prunable = true;
        }
    }

    if let Some(entry) = current {
        worktrees.extend(entry.finish(seen == 0));
    }

    worktrees
}

/// Find the worktree that has `branch` checked out.
pub fn find_worktree_for_branch<P: AsRef<Path>>(
    repo_root: P,
    branch: &str,
) -> Result<Option<WorktreeInfo>> {
    let worktrees = list_worktrees(repo_root)?;
    Ok(worktrees
        .into_iter()
        .find(|wt| wt.branch.as_deref() == Some(branch)))
}

/// Remove a worktree.
///
/// Only the worktree at `worktree_path` is touched. A worktree whose directory
/// is already gone has just its administrative entry removed; other prunable
/// worktrees are left alone.
pub fn remove_worktree<P: AsRef<Path>>(
    repo_root: P,
    worktree_path: &Path,
    force: bool,
) -> Result<()> {
    let worktree_str = worktree_path.to_string_lossy();

    let args: Vec<&str> = if force {
        vec!["worktree", "remove", "--force", &worktree_str]
    } else {
        vec!["worktree", "remove", &worktree_str]
    };

    run_git(repo_root, &args).map_err(|e| {
        ArborError::GitError(format!(
            "failed to remove worktree '{}': {}",
            worktree_str, e
        ))
    })?;

    Ok(())
}
