//! Restoring a branch to one of its backups.

use crate::backup;
use crate::delta::{self, CommitDelta};
use crate::error::{ArborError, Result};
use crate::provider::{HistoryQuery, RepositoryMutation, RepositoryQuery};
use crate::safety::{RestoreRequest, RestoreTarget, check_restore};
use chrono::Utc;
use serde::Serialize;

/// Payload of a completed restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreOutcome {
    pub branch: String,
    pub backup: String,
    pub previous_commit: String,
    pub new_commit: String,
    pub backup_deleted: bool,
    /// Set when the restore succeeded but deleting the backup did not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl RestoreOutcome {
    /// True when the branch already pointed at the backup commit.
    pub fn was_noop(&self) -> bool {
        self.previous_commit == self.new_commit
    }
}

/// What a restore would do, shown before asking for confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestorePreview {
    pub branch: String,
    pub backup: String,
    pub current_commit: String,
    pub backup_commit: String,
    /// Commits on the backup that the branch does not have.
    pub gained: CommitDelta,
    /// Commits on the branch that the backup does not have. Only computed when
    /// the branch is checked out in the active worktree.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unreachable: Option<CommitDelta>,
}

/// Pick the backup to restore `branch` from.
///
/// An explicit backup must decode and belong to `branch`. Otherwise the newest
/// backup of `branch` is used.
pub fn resolve_backup<Q: RepositoryQuery + ?Sized>(
    repo: &Q,
    branch: &str,
    explicit: Option<&str>,
) -> Result<String> {
    if let Some(name) = explicit {
        if backup::decode(name).is_none() {
            return Err(ArborError::UserError(format!(
                "'{}' is not a backup branch",
                name
            )));
        }
        if !backup::is_backup_of(name, branch) {
            return Err(ArborError::UserError(format!(
                "'{}' is not a backup of branch '{}'",
                name, branch
            )));
        }
        if !repo.branch_exists(name)? {
            return Err(ArborError::UserError(format!(
                "Backup '{}' does not exist",
                name
            )));
        }
        return Ok(name.to_string());
    }

    super::list_backups(repo, Some(branch), Utc::now())?
        .into_iter()
        .next()
        .map(|entry| entry.name)
        .ok_or_else(|| {
            ArborError::UserError(format!("No backups found for branch '{}'", branch))
        })
}

fn allowed_target<Q: RepositoryQuery + ?Sized>(
    repo: &Q,
    request: &RestoreRequest,
) -> Result<(RestoreTarget, String)> {
    let target = check_restore(repo, request)?.into_result()?;
    let backup = resolve_backup(repo, target.branch(), request.backup.as_deref())?;
    Ok((target, backup))
}

/// Describe the restore `request` would perform, without changing anything.
pub fn preview_restore<R>(
    repo: &R,
    request: &RestoreRequest,
    display_limit: usize,
) -> Result<RestorePreview>
where
    R: RepositoryQuery + HistoryQuery + ?Sized,
{
    let (target, backup) = allowed_target(repo, request)?;
    let branch = target.branch();

    let gained = delta::one_way(repo, &backup, branch, display_limit)?;
    let unreachable = if target.checked_out_here() {
        Some(delta::one_way(repo, branch, &backup, display_limit)?)
    } else {
        None
    };

    Ok(RestorePreview {
        branch: branch.to_string(),
        current_commit: repo.commit_hash_of(branch)?,
        backup_commit: repo.commit_hash_of(&backup)?,
        backup,
        gained,
        unreachable,
    })
}

/// Move the requested branch to its backup's commit.
///
/// A branch checked out in the active worktree is hard-reset; any other branch
/// has its ref updated. Restoring to the commit the branch already points at
/// changes nothing.
pub fn restore_branch<R>(repo: &R, request: &RestoreRequest) -> Result<RestoreOutcome>
where
    R: RepositoryQuery + RepositoryMutation + ?Sized,
{
    let (target, backup) = allowed_target(repo, request)?;
    let branch = target.branch().to_string();

    let previous_commit = repo.commit_hash_of(&branch)?;
    let new_commit = repo.commit_hash_of(&backup)?;

    if previous_commit == new_commit {
        tracing::info!(branch = %branch, backup = %backup, "branch already at backup commit");
    } else {
        let moved = if target.checked_out_here() {
            repo.reset_hard_current_branch(&new_commit)
        } else {
            repo.force_update_branch(&branch, &new_commit)
        };
        moved.map_err(|e| {
            ArborError::GitError(format!(
                "Failed to restore '{}' from '{}': {}",
                branch, backup, e
            ))
        })?;
    }

    let mut backup_deleted = false;
    let mut warning = None;
    if request.delete_backup_after {
        match repo.delete_branch(&backup, true) {
            Ok(()) => {
                backup_deleted = true;
                if let Err(e) = repo.delete_branch_description(&backup) {
                    tracing::warn!(backup = %backup, error = %e, "could not remove backup description");
                }
            }
            Err(e) => {
                tracing::warn!(backup = %backup, error = %e, "could not delete backup after restore");
                warning = Some(format!(
                    "Restored, but backup '{}' was not deleted: {}",
                    backup, e
                ));
            }
        }
    }

    Ok(RestoreOutcome {
        branch,
        backup,
        previous_commit,
        new_commit,
        backup_deleted,
        warning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::CommitLogEntry;
    use crate::lifecycle::{CreateBackupRequest, create_backup};
    use crate::provider::GitRepository;
    use crate::safety::DenialReason;
    use crate::test_support::{FakeRepo, MutationCall, commit_file, create_test_repo};
    use chrono::{DateTime, TimeZone};

    const BACKUP: &str = "backup/main/20250117-153045";

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 17, 15, 30, 45).unwrap()
    }

    fn request(backup: Option<&str>, force: bool) -> RestoreRequest {
        RestoreRequest {
            branch: None,
            backup: backup.map(String::from),
            force,
            delete_backup_after: false,
        }
    }

    #[test]
    fn test_restore_current_branch_from_backup() {
        let repo = FakeRepo::new().with_branch("main", "abc123");
        let created = create_backup(&repo, &CreateBackupRequest::default(), instant()).unwrap();
        assert_eq!(created.name, BACKUP);

        // Three more commits land on main.
        repo.set_branch_commit("main", "latest");

        let outcome = restore_branch(&repo, &request(Some(BACKUP), true)).unwrap();
        assert_eq!(outcome.branch, "main");
        assert_eq!(outcome.backup, BACKUP);
        assert_eq!(outcome.previous_commit, "latest");
        assert_eq!(outcome.new_commit, "abc123");
        assert!(!outcome.backup_deleted);
        assert_eq!(repo.branch_commit("main").as_deref(), Some("abc123"));
        assert!(repo.calls().contains(&MutationCall::ResetHard {
            commit: "abc123".into()
        }));

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["previousCommit"], "latest");
        assert_eq!(json["newCommit"], "abc123");
        assert_eq!(json["backupDeleted"], false);
    }

    #[test]
    fn test_restore_other_branch_updates_ref() {
        let repo = FakeRepo::new()
            .with_branch("feature", "f2")
            .with_branch("backup/feature/20250117-153045", "f1");
        let request = RestoreRequest {
            branch: Some("feature".into()),
            ..Default::default()
        };

        let outcome = restore_branch(&repo, &request).unwrap();
        assert_eq!(outcome.backup, "backup/feature/20250117-153045");
        assert_eq!(
            repo.calls(),
            vec![MutationCall::ForceUpdateBranch {
                name: "feature".into(),
                commit: "f1".into()
            }]
        );
    }

    #[test]
    fn test_restore_defaults_to_newest_backup() {
        let repo = FakeRepo::new()
            .with_branch("backup/main/20250101-000000", "old")
            .with_branch("backup/main/20250110-000000", "new")
            .with_branch("backup/main-2/20250120-000000", "other");

        let outcome = restore_branch(&repo, &request(None, false)).unwrap();
        assert_eq!(outcome.backup, "backup/main/20250110-000000");
        assert_eq!(outcome.new_commit, "new");
    }

    #[test]
    fn test_backup_of_another_branch_is_rejected() {
        let repo = FakeRepo::new().with_branch("backup/feature/20250117-153045", "f1");
        let err = restore_branch(&repo, &request(Some("backup/feature/20250117-153045"), false))
            .unwrap_err();
        assert!(matches!(err, ArborError::UserError(_)));
        assert!(repo.calls().is_empty());
    }

    #[test]
    fn test_no_backups_is_user_error() {
        let repo = FakeRepo::new();
        let err = restore_branch(&repo, &request(None, false)).unwrap_err();
        assert!(err.to_string().contains("No backups found"));
    }

    #[test]
    fn test_denial_happens_before_any_mutation() {
        let repo = FakeRepo::new().with_branch(BACKUP, "abc123").dirty("/repo");
        let err = restore_branch(&repo, &request(Some(BACKUP), false)).unwrap_err();
        assert!(matches!(
            err,
            ArborError::SafetyDenied(DenialReason::UncommittedChanges(_))
        ));
        assert!(repo.calls().is_empty());
    }

    #[test]
    fn test_restore_to_same_commit_is_noop() {
        let repo = FakeRepo::new().with_branch(BACKUP, "m0");
        let outcome = restore_branch(&repo, &request(Some(BACKUP), false)).unwrap();
        assert!(outcome.was_noop());
        assert!(repo.calls().is_empty());
    }

    #[test]
    fn test_delete_backup_after_restore() {
        let repo = FakeRepo::new().with_branch(BACKUP, "abc123");
        let mut req = request(Some(BACKUP), false);
        req.delete_backup_after = true;

        let outcome = restore_branch(&repo, &req).unwrap();
        assert!(outcome.backup_deleted);
        assert!(!repo.branch_exists(BACKUP).unwrap());
    }

    #[test]
    fn test_failed_backup_deletion_is_a_warning() {
        let repo = FakeRepo::new()
            .with_branch(BACKUP, "abc123")
            .fail_when(MutationCall::DeleteBranch {
                name: BACKUP.into(),
                force: true,
            });
        let mut req = request(Some(BACKUP), false);
        req.delete_backup_after = true;

        let outcome = restore_branch(&repo, &req).unwrap();
        assert!(!outcome.backup_deleted);
        assert!(outcome.warning.is_some());
        assert_eq!(repo.branch_commit("main").as_deref(), Some("abc123"));
    }

    #[test]
    fn test_preview_unreachable_only_for_current_branch() {
        let lost = CommitLogEntry {
            hash: "latest".into(),
            message: "Work in progress".into(),
        };
        let repo = FakeRepo::new()
            .with_branch(BACKUP, "abc123")
            .with_branch("feature", "f2")
            .with_branch("backup/feature/20250117-153045", "f1")
            .with_history("main", BACKUP, vec![lost.clone()])
            .with_history("feature", "backup/feature/20250117-153045", vec![lost.clone()]);

        let preview = preview_restore(&repo, &request(Some(BACKUP), false), 10).unwrap();
        assert_eq!(preview.current_commit, "m0");
        assert_eq!(preview.backup_commit, "abc123");
        assert_eq!(preview.unreachable.unwrap().commits, vec![lost]);

        let other = RestoreRequest {
            branch: Some("feature".into()),
            ..Default::default()
        };
        let preview = preview_restore(&repo, &other, 10).unwrap();
        assert_eq!(preview.unreachable, None);
        assert!(repo.calls().is_empty());
    }

    #[test]
    fn test_restore_against_real_git() {
        let temp_dir = create_test_repo();
        let path = temp_dir.path();
        let repo = GitRepository::at(path);

        let created = create_backup(&repo, &CreateBackupRequest::default(), instant()).unwrap();
        for i in 0..3 {
            commit_file(path, &format!("later{}.txt", i), "x\n", &format!("Later {}", i));
        }
        let latest = repo.commit_hash_of("main").unwrap();

        let preview = preview_restore(&repo, &request(Some(&created.name), false), 10).unwrap();
        assert_eq!(preview.unreachable.as_ref().unwrap().total_count, 3);
        assert_eq!(preview.gained.total_count, 0);

        let outcome = restore_branch(&repo, &request(Some(&created.name), true)).unwrap();
        assert_eq!(outcome.previous_commit, latest);
        assert_eq!(outcome.new_commit, created.commit);
        assert_eq!(repo.commit_hash_of("HEAD").unwrap(), created.commit);
        assert!(!path.join("later0.txt").exists());
    }
}
