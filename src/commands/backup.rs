//! Implementation of `arbor backup create|list|delete`.

use super::Session;
use crate::batch::BatchResult;
use crate::cli::{BackupCreateArgs, BackupDeleteArgs, BackupListArgs};
use crate::delta::abbreviate;
use crate::error::Result;
use crate::lifecycle::{self, CreateBackupRequest};
use crate::output::{Envelope, Status, batch_outcome};
use crate::provider::Confirmation;
use chrono::Utc;

pub fn cmd_backup_create(session: &Session, args: BackupCreateArgs) -> Result<()> {
    let request = CreateBackupRequest {
        branch: args.branch,
        message: args.message,
    };
    let created = lifecycle::create_backup(&session.repo, &request, Utc::now())?;

    if let Some(warning) = &created.warning {
        session.output.warn(warning);
    }
    let status = if created.warning.is_some() {
        Status::Warning
    } else {
        Status::Ok
    };

    session.output.result(status, created, |created| {
        println!(
            "Created backup {} of '{}' at {}",
            created.name,
            created.source_branch,
            abbreviate(&created.commit)
        );
    })
}

pub fn cmd_backup_list(session: &Session, args: BackupListArgs) -> Result<()> {
    let entries = lifecycle::list_backups(&session.repo, args.branch.as_deref(), Utc::now())?;

    session.output.result(Status::Ok, entries, |entries| {
        if entries.is_empty() {
            println!("No backups found.");
            return;
        }
        for entry in entries {
            let message = entry
                .message
                .as_deref()
                .map(|m| format!("  {}", m))
                .unwrap_or_default();
            println!(
                "{}  {}  ({}){}",
                entry.name,
                abbreviate(&entry.commit),
                entry.age,
                message
            );
        }
    })
}

pub fn cmd_backup_delete(
    session: &Session,
    args: BackupDeleteArgs,
    prompt: &dyn Confirmation,
) -> Result<()> {
    let question = format!("Delete {} backup(s)?", args.names.len());
    if !prompt.confirm(&question)? {
        return session.output.aborted();
    }

    let result = lifecycle::delete_backups(&session.repo, &args.names);
    print_batch(session, &result, "Deleted");
    batch_outcome(&result)
}

/// Print a batch result: one line per item in human mode, the envelope in JSON mode.
pub(super) fn print_batch(session: &Session, result: &BatchResult, verb: &str) {
    if session.output.json {
        match Envelope::batch(result.clone()).to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: {}", e),
        }
        return;
    }

    for item in &result.items {
        if item.succeeded {
            println!("{}: {}", verb, item.identifier);
            if let Some(warning) = &item.warning {
                session.output.warn(&format!("{}: {}", item.identifier, warning));
            }
        } else {
            println!(
                "Failed: {} ({})",
                item.identifier,
                item.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
    println!(
        "{} succeeded, {} failed",
        result.succeeded_count, result.failed_count
    );
}
