//! Creating, listing and deleting backup branches.

use crate::backup::{self, BackupIdentity};
use crate::batch::{BatchResult, run_batch_with_followup};
use crate::error::{ArborError, Result};
use crate::provider::{RepositoryMutation, RepositoryQuery};
use crate::safety::DenialReason;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// What to back up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateBackupRequest {
    /// Source branch. `None` means the branch checked out in the active worktree.
    pub branch: Option<String>,
    /// Stored as the backup branch's description.
    pub message: Option<String>,
}

/// Payload of a successful backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupCreated {
    pub name: String,
    pub source_branch: String,
    pub commit: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Set when the backup exists but its message could not be stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Create `backup/<source>/<timestamp>` at the source branch's current commit.
pub fn create_backup<R>(
    repo: &R,
    request: &CreateBackupRequest,
    now: DateTime<Utc>,
) -> Result<BackupCreated>
where
    R: RepositoryQuery + RepositoryMutation + ?Sized,
{
    let source_branch = match &request.branch {
        Some(branch) => branch.clone(),
        None => repo
            .current_branch()?
            .ok_or(ArborError::SafetyDenied(DenialReason::DetachedHead))?,
    };

    if !repo.branch_exists(&source_branch)? {
        return Err(DenialReason::BranchNotFound(source_branch).into());
    }

    let commit = repo.commit_hash_of(&source_branch)?;
    let identity = BackupIdentity::new(source_branch, now);
    let name = identity.branch_name();

    if repo.branch_exists(&name)? {
        return Err(ArborError::UserError(format!(
            "Backup '{}' already exists; wait a second and try again",
            name
        )));
    }

    repo.create_branch(&name, &commit).map_err(|e| {
        ArborError::GitError(format!("Failed to create backup branch '{}': {}", name, e))
    })?;

    let mut warning = None;
    if let Some(message) = &request.message
        && let Err(e) = repo.set_branch_description(&name, message)
    {
        tracing::warn!(backup = %name, error = %e, "could not store backup message");
        warning = Some(format!("Backup created but its message was not saved: {}", e));
    }

    Ok(BackupCreated {
        name,
        source_branch: identity.source_branch,
        commit,
        timestamp: identity.instant,
        message: request.message.clone(),
        warning,
    })
}

/// One backup branch as shown by `backup list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupEntry {
    pub name: String,
    pub source_branch: String,
    pub timestamp: DateTime<Utc>,
    pub commit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Human-readable age, e.g. `3 hours ago`.
    pub age: String,
}

/// Backups in the repository, newest first.
///
/// Branches under `backup/` that do not decode are skipped. With `source_branch`
/// set, only exact backups of that branch are returned.
pub fn list_backups<Q: RepositoryQuery + ?Sized>(
    repo: &Q,
    source_branch: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Vec<BackupEntry>> {
    let mut entries = Vec::new();

    for name in repo.list_branches(backup::BACKUP_PREFIX)? {
        let Some(identity) = backup::decode_checked(&name)? else {
            tracing::debug!(branch = %name, "skipping non-backup branch under backup/");
            continue;
        };
        if let Some(source) = source_branch
            && identity.source_branch != source
        {
            continue;
        }

        entries.push(BackupEntry {
            commit: repo.commit_hash_of(&name)?,
            message: repo.branch_description(&name)?,
            age: backup::relative_time(identity.instant, now),
            timestamp: identity.instant,
            source_branch: identity.source_branch,
            name,
        });
    }

    entries.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(entries)
}

/// Delete backup branches, removing their descriptions as a follow-up.
pub fn delete_backups<R>(repo: &R, names: &[String]) -> BatchResult
where
    R: RepositoryQuery + RepositoryMutation + ?Sized,
{
    run_batch_with_followup(
        names,
        |name| name.clone(),
        |name| {
            if backup::decode(name).is_none() {
                return Err(ArborError::UserError(format!(
                    "'{}' is not a backup branch",
                    name
                )));
            }
            if !repo.branch_exists(name)? {
                return Err(DenialReason::BranchNotFound(name.clone()).into());
            }
            repo.delete_branch(name, true).map_err(|e| {
                ArborError::GitError(format!("Failed to delete backup '{}': {}", name, e))
            })
        },
        |name| repo.delete_branch_description(name),
    )
}
