//! Git plumbing for branches, worktrees, remotes and history.
//!
//! These are the concrete subprocess calls behind [`crate::provider::GitRepository`]:
//!
//! - Creating, moving and deleting branches (and their descriptions)
//! - Resolving HEAD and refs
//! - Listing and removing worktrees
//! - Fetch-with-prune and upstream-gone detection
//! - Bounded commit-range queries
//!
//! All git failures are mapped to `ArborError::GitError` (exit code 3).

mod branch;
mod history;
mod refs;
mod remote;
mod worktree;

pub use branch::{
    branch_description, branch_exists, create_branch, delete_branch, delete_branch_description,
    force_update_branch, is_branch_merged, list_branches, reset_hard, set_branch_description,
};
pub use history::commits_reachable_only_from;
pub use refs::{commit_hash_of, current_branch};
pub use remote::{fetch_prune, upstream_gone};
pub use worktree::{find_worktree_for_branch, list_worktrees, remove_worktree};
