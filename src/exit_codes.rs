//! Exit code constants for the arbor CLI.
//!
//! - 0: Success (including batches that completed with warnings)
//! - 1: User error (bad args, unknown backup, missing branch)
//! - 2: Safety denial (dirty tree, branch checked out elsewhere, not merged)
//! - 3: Git operation failure
//! - 4: Partial failure (at least one batch item failed)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid input, or unusable repository state.
pub const USER_ERROR: i32 = 1;

/// A safety check refused a destructive operation.
pub const SAFETY_DENIED: i32 = 2;

/// Git operation failure: subprocess errors from branch, worktree or fetch commands.
pub const GIT_FAILURE: i32 = 3;

/// A batch completed but one or more of its items failed.
pub const PARTIAL_FAILURE: i32 = 4;
