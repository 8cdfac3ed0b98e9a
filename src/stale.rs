//! Stale worktree classification.
//!
//! Every worktree except the primary one gets at most one [`StaleReason`], with
//! `merged` taking precedence over `gone` and `gone` over `prunable`. Dirty
//! state is reported alongside the reason, never folded into it.

use crate::error::{ArborError, Result};
use crate::provider::{RepositoryMutation, RepositoryQuery, WorktreeInfo};
use serde::Serialize;
use std::path::PathBuf;

/// Why a worktree is eligible for cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StaleReason {
    /// The branch is fully merged into the target branch.
    Merged,
    /// The branch's upstream no longer exists on the remote.
    Gone,
    /// Git considers the worktree prunable.
    Prunable,
}

impl std::fmt::Display for StaleReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            StaleReason::Merged => "merged",
            StaleReason::Gone => "gone",
            StaleReason::Prunable => "prunable",
        };
        f.write_str(label)
    }
}

/// A secondary worktree with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaleWorktreeInfo {
    pub path: PathBuf,
    pub branch: Option<String>,
    /// HEAD commit of the worktree.
    pub commit: String,
    /// Git reports the worktree directory as missing or invalid, whatever
    /// the stale reason.
    pub is_prunable: bool,
    pub has_uncommitted_changes: bool,
    pub stale_reason: Option<StaleReason>,
}

impl StaleWorktreeInfo {
    pub fn is_stale(&self) -> bool {
        self.stale_reason.is_some()
    }
}

/// Inputs to [`refresh_and_classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Branch that `merged` is measured against.
    pub target_branch: String,
    /// Remote to fetch-with-prune first, if any.
    pub fetch_remote: Option<String>,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            target_branch: "main".to_string(),
            fetch_remote: None,
        }
    }
}

/// Result of a classification run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub worktrees: Vec<StaleWorktreeInfo>,
    /// Set when the fetch pre-step failed; classification used local state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
}

impl Classification {
    pub fn stale(&self) -> impl Iterator<Item = &StaleWorktreeInfo> {
        self.worktrees.iter().filter(|wt| wt.is_stale())
    }
}

/// Pick the single stale reason for `worktree`, if any.
pub fn stale_reason<Q: RepositoryQuery + ?Sized>(
    repo: &Q,
    worktree: &WorktreeInfo,
    target_branch: &str,
) -> Result<Option<StaleReason>> {
    if let Some(branch) = &worktree.branch
        && branch != target_branch
    {
        if repo.is_branch_merged(branch, target_branch)? {
            return Ok(Some(StaleReason::Merged));
        }
        if repo.upstream_gone(branch)? {
            return Ok(Some(StaleReason::Gone));
        }
    }

    if worktree.prunable {
        return Ok(Some(StaleReason::Prunable));
    }

    Ok(None)
}

/// Classify every secondary worktree against `target_branch`.
pub fn classify_worktrees<Q: RepositoryQuery + ?Sized>(
    repo: &Q,
    target_branch: &str,
) -> Result<Vec<StaleWorktreeInfo>> {
    if !repo.branch_exists(target_branch)? {
        return Err(ArborError::UserError(format!(
            "Target branch '{}' does not exist",
            target_branch
        )));
    }

    let mut classified = Vec::new();
    for worktree in repo.list_worktrees()? {
        if worktree.is_main {
            continue;
        }

        let stale_reason = stale_reason(repo, &worktree, target_branch)?;
        // A prunable worktree has no usable directory to inspect.
        let has_uncommitted_changes =
            !worktree.prunable && repo.has_uncommitted_changes(&worktree.path)?;

        tracing::debug!(
            path = %worktree.path.display(),
            reason = ?stale_reason,
            dirty = has_uncommitted_changes,
            "classified worktree"
        );

        classified.push(StaleWorktreeInfo {
            path: worktree.path,
            branch: worktree.branch,
            commit: worktree.head,
            is_prunable: worktree.prunable,
            has_uncommitted_changes,
            stale_reason,
        });
    }

    Ok(classified)
}

/// Optionally fetch-with-prune, then classify.
///
/// A failed fetch is recorded in [`Classification::fetch_error`] and
/// classification continues with whatever tracking data is already local.
pub fn refresh_and_classify<R>(repo: &R, options: &ClassifyOptions) -> Result<Classification>
where
    R: RepositoryQuery + RepositoryMutation + ?Sized,
{
    let fetch_error = match &options.fetch_remote {
        Some(remote) => match repo.fetch_prune(remote) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(remote = %remote, error = %e, "fetch failed; using local tracking data");
                Some(e.to_string())
            }
        },
        None => None,
    };

    let worktrees = classify_worktrees(repo, &options.target_branch)?;
    Ok(Classification {
        worktrees,
        fetch_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeRepo, MutationCall};

    const MERGED: &str = "/repo/.worktrees/merged";
    const GONE: &str = "/repo/.worktrees/gone";

    fn reason_of(classified: &[StaleWorktreeInfo], path: &str) -> Option<StaleReason> {
        classified
            .iter()
            .find(|wt| wt.path == PathBuf::from(path))
            .and_then(|wt| wt.stale_reason)
    }

    #[test]
    fn test_precedence_merged_over_gone_over_prunable() {
        let repo = FakeRepo::new()
            .with_branch("both", "b1")
            .with_worktree("/repo/.worktrees/both", Some("both"))
            .merged_into("both", "main")
            .upstream_gone_for("both")
            .prunable("/repo/.worktrees/both")
            .with_branch("gone-and-prunable", "g1")
            .with_worktree("/repo/.worktrees/gp", Some("gone-and-prunable"))
            .upstream_gone_for("gone-and-prunable")
            .prunable("/repo/.worktrees/gp");

        let classified = classify_worktrees(&repo, "main").unwrap();
        assert_eq!(
            reason_of(&classified, "/repo/.worktrees/both"),
            Some(StaleReason::Merged)
        );
        assert_eq!(
            reason_of(&classified, "/repo/.worktrees/gp"),
            Some(StaleReason::Gone)
        );
    }

    #[test]
    fn test_primary_worktree_is_never_listed() {
        let repo = FakeRepo::new();
        assert!(classify_worktrees(&repo, "main").unwrap().is_empty());
    }

    #[test]
    fn test_detached_worktree_can_only_be_prunable() {
        let repo = FakeRepo::new()
            .with_worktree("/repo/.worktrees/detached", None)
            .with_worktree("/repo/.worktrees/lost", None)
            .prunable("/repo/.worktrees/lost");

        let classified = classify_worktrees(&repo, "main").unwrap();
        assert_eq!(reason_of(&classified, "/repo/.worktrees/detached"), None);
        assert_eq!(
            reason_of(&classified, "/repo/.worktrees/lost"),
            Some(StaleReason::Prunable)
        );
    }

    #[test]
    fn test_dirty_state_is_independent_of_reason() {
        let repo = FakeRepo::new()
            .with_branch("done", "d1")
            .with_worktree(MERGED, Some("done"))
            .merged_into("done", "main")
            .dirty(MERGED)
            .with_branch("active", "a1")
            .with_worktree("/repo/.worktrees/active", Some("active"))
            .dirty("/repo/.worktrees/active");

        let classified = classify_worktrees(&repo, "main").unwrap();
        let merged = classified.iter().find(|w| w.path == PathBuf::from(MERGED)).unwrap();
        assert_eq!(merged.stale_reason, Some(StaleReason::Merged));
        assert!(merged.has_uncommitted_changes);

        let active = classified
            .iter()
            .find(|w| w.branch.as_deref() == Some("active"))
            .unwrap();
        assert_eq!(active.stale_reason, None);
        assert!(active.has_uncommitted_changes);
    }

    #[test]
    fn test_target_branch_is_never_merged_into_itself() {
        let repo = FakeRepo::new()
            .with_branch("develop", "d1")
            .with_worktree("/repo/.worktrees/develop", Some("develop"));

        let classified = classify_worktrees(&repo, "develop").unwrap();
        assert_eq!(classified[0].stale_reason, None);
    }

    #[test]
    fn test_missing_target_branch_is_user_error() {
        let repo = FakeRepo::new();
        let err = classify_worktrees(&repo, "trunk").unwrap_err();
        assert!(matches!(err, ArborError::UserError(_)));
    }

    #[test]
    fn test_fetch_failure_is_not_fatal() {
        let repo = FakeRepo::new()
            .with_branch("done", "d1")
            .with_worktree(MERGED, Some("done"))
            .merged_into("done", "main")
            .fail_when(MutationCall::FetchPrune {
                remote: "origin".into(),
            });

        let options = ClassifyOptions {
            target_branch: "main".into(),
            fetch_remote: Some("origin".into()),
        };
        let classification = refresh_and_classify(&repo, &options).unwrap();
        assert!(classification.fetch_error.is_some());
        assert_eq!(classification.stale().count(), 1);
    }

    #[test]
    fn test_fetch_runs_before_classification() {
        let repo = FakeRepo::new();
        let options = ClassifyOptions {
            target_branch: "main".into(),
            fetch_remote: Some("origin".into()),
        };
        let classification = refresh_and_classify(&repo, &options).unwrap();
        assert_eq!(classification.fetch_error, None);
        assert_eq!(
            repo.calls(),
            vec![MutationCall::FetchPrune {
                remote: "origin".into()
            }]
        );
    }

    #[test]
    fn test_merged_and_gone_end_to_end_payload() {
        let repo = FakeRepo::new()
            .with_branch("shipped", "s1")
            .with_worktree(MERGED, Some("shipped"))
            .merged_into("shipped", "main")
            .with_branch("abandoned", "x1")
            .with_worktree(GONE, Some("abandoned"))
            .upstream_gone_for("abandoned");

        let classified = classify_worktrees(&repo, "main").unwrap();
        assert_eq!(reason_of(&classified, MERGED), Some(StaleReason::Merged));
        assert_eq!(reason_of(&classified, GONE), Some(StaleReason::Gone));

        let json = serde_json::to_value(&classified).unwrap();
        assert_eq!(json[0]["staleReason"], "merged");
        assert_eq!(json[1]["staleReason"], "gone");
        assert_eq!(json[1]["hasUncommittedChanges"], false);
        assert_eq!(json[1]["isPrunable"], false);
        assert_eq!(json[1]["commit"], "x1");
    }

    #[test]
    fn test_merged_worktree_keeps_prunable_flag() {
        let repo = FakeRepo::new()
            .with_branch("both", "b1")
            .with_worktree("/repo/.worktrees/both", Some("both"))
            .merged_into("both", "main")
            .prunable("/repo/.worktrees/both")
            .dirty("/repo/.worktrees/both");

        let classified = classify_worktrees(&repo, "main").unwrap();
        let both = &classified[0];
        assert_eq!(both.stale_reason, Some(StaleReason::Merged));
        assert!(both.is_prunable);
        // A missing directory is never reported as dirty.
        assert!(!both.has_uncommitted_changes);

        let json = serde_json::to_value(both).unwrap();
        assert_eq!(json["isPrunable"], true);
        assert_eq!(json["staleReason"], "merged");
    }
}
