//! Display and formatting utilities for clean command output.

use crate::commands::Output;
use crate::delta::abbreviate;
use crate::stale::{StaleReason, StaleWorktreeInfo};
use std::path::Path;

/// Print the stale worktrees grouped by reason.
pub fn print_cleanup_plan(output: Output, stale: &[StaleWorktreeInfo], repo_root: &Path) {
    output.info(&format!("Stale worktrees ({}):", stale.len()));
    for candidate in stale {
        output.info(&format!("  - {}", candidate_label(candidate, repo_root)));
    }
    output.info("");
}

/// One line per candidate: relative path, branch, reason, and a dirty marker.
/// A worktree that is missing on disk says so even when another reason won.
pub fn candidate_label(candidate: &StaleWorktreeInfo, repo_root: &Path) -> String {
    let rel_path = make_relative(&candidate.path, repo_root);
    let branch_info = candidate
        .branch
        .as_ref()
        .map(|b| format!(" [branch: {}]", b))
        .unwrap_or_else(|| format!(" [detached {}]", abbreviate(&candidate.commit)));
    let mut reason = candidate
        .stale_reason
        .map(|r| format!(" ({})", r))
        .unwrap_or_default();
    if candidate.is_prunable && candidate.stale_reason != Some(StaleReason::Prunable) {
        reason.push_str(" (directory missing)");
    }
    let dirty = if candidate.has_uncommitted_changes {
        " *uncommitted changes*"
    } else {
        ""
    };
    format!("{}{}{}{}", rel_path, branch_info, reason, dirty)
}

/// Make a path relative to repo_root for display.
pub fn make_relative(path: &Path, repo_root: &Path) -> String {
    path.strip_prefix(repo_root)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.display().to_string())
}
