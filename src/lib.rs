//! Arbor: safe lifecycle management for git branches and worktrees.
//!
//! The library holds everything the `arbor` binary does, layered bottom-up:
//!
//! - [`backup`]: the `backup/<branch>/<YYYYMMDD-HHmmss>` naming codec
//! - [`delta`]: bounded commit deltas between two refs
//! - [`stale`]: classification of secondary worktrees as merged, gone or prunable
//! - [`safety`]: the gates that refuse restores and deletions that would lose work
//! - [`batch`]: per-item execution with aggregated results
//! - [`lifecycle`]: the operations that tie the above to a repository
//!
//! Git access goes through the traits in [`provider`], implemented for real
//! repositories by [`provider::GitRepository`].

pub mod backup;
pub mod batch;
pub mod cli;
pub mod commands;
pub mod config;
pub mod delta;
pub mod error;
pub mod exit_codes;
pub mod git;
pub mod git_worktree;
pub mod lifecycle;
pub mod logging;
pub mod output;
pub mod provider;
pub mod safety;
pub mod stale;

#[cfg(test)]
mod test_support;
