//! Implementation of `arbor restore`.

use super::Session;
use crate::cli::RestoreArgs;
use crate::delta::abbreviate;
use crate::error::Result;
use crate::lifecycle::{self, RestorePreview};
use crate::output::Status;
use crate::provider::Confirmation;
use crate::safety::RestoreRequest;

pub fn cmd_restore(session: &Session, args: RestoreArgs, prompt: &dyn Confirmation) -> Result<()> {
    let request = RestoreRequest {
        branch: args.branch,
        backup: args.backup,
        force: args.force,
        delete_backup_after: args.delete_backup || session.config.delete_backup_after_restore,
    };

    let preview =
        lifecycle::preview_restore(&session.repo, &request, session.config.commit_display_limit)?;
    print_preview(session, &preview);

    let question = format!("Restore '{}' to {}?", preview.branch, preview.backup);
    if !prompt.confirm(&question)? {
        return session.output.aborted();
    }

    // Pin the backup chosen for the preview so the restore cannot pick another.
    let request = RestoreRequest {
        backup: Some(preview.backup),
        ..request
    };
    let outcome = lifecycle::restore_branch(&session.repo, &request)?;

    if let Some(warning) = &outcome.warning {
        session.output.warn(warning);
    }
    let status = if outcome.warning.is_some() {
        Status::Warning
    } else {
        Status::Ok
    };

    session.output.result(status, outcome, |outcome| {
        if outcome.was_noop() {
            println!(
                "'{}' already at {}; nothing to restore",
                outcome.branch,
                abbreviate(&outcome.new_commit)
            );
        } else {
            println!(
                "Restored '{}' from {} ({} -> {})",
                outcome.branch,
                outcome.backup,
                abbreviate(&outcome.previous_commit),
                abbreviate(&outcome.new_commit)
            );
        }
        if outcome.backup_deleted {
            println!("Deleted backup {}", outcome.backup);
        }
    })
}

fn print_preview(session: &Session, preview: &RestorePreview) {
    let width = session.config.message_width;
    let out = session.output;

    out.info(&format!(
        "Restoring '{}' from {}: {} -> {}",
        preview.branch,
        preview.backup,
        abbreviate(&preview.current_commit),
        abbreviate(&preview.backup_commit)
    ));

    if let Some(unreachable) = &preview.unreachable
        && unreachable.total_count > 0
    {
        out.info(&format!(
            "{} commit(s) will no longer be reachable from '{}':",
            unreachable.total_count, preview.branch
        ));
        for line in unreachable.display_lines(width) {
            out.info(&format!("  {}", line));
        }
    }

    if preview.gained.total_count > 0 {
        out.info(&format!(
            "{} commit(s) from the backup will be brought back:",
            preview.gained.total_count
        ));
        for line in preview.gained.display_lines(width) {
            out.info(&format!("  {}", line));
        }
    }
}
