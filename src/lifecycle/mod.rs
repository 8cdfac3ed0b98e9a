//! Branch and worktree lifecycle operations.
//!
//! Each operation composes the codec, the validators and the batch executor
//! over the provider traits, and returns the payload the command layer prints.
//! Prompting never happens here: callers pass already-resolved targets.

mod backup;
mod branch_delete;
mod cleanup;
mod restore;

pub use backup::{
    BackupCreated, BackupEntry, CreateBackupRequest, create_backup, delete_backups, list_backups,
};
pub use branch_delete::delete_branches;
pub use cleanup::{RemoveOptions, plan_cleanup, remove_worktrees};
pub use restore::{RestoreOutcome, RestorePreview, preview_restore, resolve_backup, restore_branch};
