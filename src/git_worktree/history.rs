//! Read-only history queries.

use crate::delta::{CommitDelta, CommitLogEntry};
use crate::error::{ArborError, Result};
use crate::git::run_git;
use std::path::Path;

const FIELD_SEPARATOR: char = '\u{1f}';

/// Commits reachable from `reference` but not from `excluding`.
///
/// At most `limit` commits are returned, newest first; `total_count` is the
/// full count regardless of the limit.
pub fn commits_reachable_only_from<P: AsRef<Path>>(
    repo_root: P,
    reference: &str,
    excluding: &str,
    limit: usize,
) -> Result<CommitDelta> {
    let repo_root = repo_root.as_ref();
    let range = format!("{}..{}", excluding, reference);

    let count = run_git(repo_root, &["rev-list", "--count", &range])?;
    let total_count = count.stdout.parse::<usize>().map_err(|e| {
        ArborError::GitError(format!(
            "unexpected rev-list count '{}' for {}: {}",
            count.stdout, range, e
        ))
    })?;

    if total_count == 0 || limit == 0 {
        return Ok(CommitDelta {
            commits: Vec::new(),
            total_count,
        });
    }

    let max_count = format!("--max-count={}", limit);
    let log = run_git(
        repo_root,
        &["log", "--format=%H%x1f%s", &max_count, &range],
    )?;

    let commits = log
        .lines()
        .into_iter()
        .filter_map(|line| {
            let (hash, message) = line.split_once(FIELD_SEPARATOR)?;
            Some(CommitLogEntry {
                hash: hash.to_string(),
                message: message.to_string(),
            })
        })
        .collect();

    Ok(CommitDelta {
        commits,
        total_count,
    })
}
