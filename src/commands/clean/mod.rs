//! Implementation of the `arbor clean` command.
//!
//! Finds secondary worktrees that are no longer needed and removes the ones
//! the user picks:
//! - `merged`: the branch is fully merged into the target branch
//! - `gone`: the branch's upstream was deleted on the remote
//! - `prunable`: git reports the worktree directory as missing
//!
//! # Safety
//!
//! - Worktrees with uncommitted changes are refused unless `--force`
//! - `--force` with dirty worktrees selected asks once more before removing
//! - Branches are only deleted with `--delete-branches`, and still go through
//!   the delete gate after their worktree is removed
//! - `--dry-run` classifies and prints, nothing else

mod display;


use super::Session;
use super::backup::print_batch;
use crate::batch::BatchResult;
use crate::cli::CleanArgs;
use crate::error::Result;
use crate::lifecycle::{self, RemoveOptions};
use crate::output::{Status, batch_outcome};
use crate::provider::Confirmation;
use crate::stale::{ClassifyOptions, StaleWorktreeInfo};
use serde::Serialize;

use display::{candidate_label, print_cleanup_plan};

/// JSON payload of `arbor clean`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanReport {
    /// Every secondary worktree with its classification.
    pub worktrees: Vec<StaleWorktreeInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
    /// Absent for dry runs and when nothing was stale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removal: Option<BatchResult>,
}

/// Execute the `arbor clean` command.
pub fn cmd_clean(session: &Session, args: CleanArgs, prompt: &dyn Confirmation) -> Result<()> {
    let config = &session.config;
    let target_branch = args.target.unwrap_or_else(|| config.target_branch.clone());
    let fetch_remote =
        (!args.no_fetch && config.fetch_before_cleanup).then(|| config.remote.clone());

    let options = ClassifyOptions {
        target_branch: target_branch.clone(),
        fetch_remote,
    };
    let plan = lifecycle::plan_cleanup(&session.repo, &options)?;

    if let Some(error) = &plan.fetch_error {
        session
            .output
            .warn(&format!("fetch failed, using local tracking data: {}", error));
    }

    let stale: Vec<StaleWorktreeInfo> = plan.stale().cloned().collect();
    let mut report = CleanReport {
        worktrees: plan.worktrees,
        fetch_error: plan.fetch_error,
        removal: None,
    };

    if stale.is_empty() {
        return session.output.result(Status::Ok, report, |_| {
            println!("No stale worktrees found.");
        });
    }

    let root = session.repo.root();
    print_cleanup_plan(session.output, &stale, root);

    if args.dry_run {
        return session.output.result(Status::Ok, report, |_| {
            println!();
            println!("Dry-run mode: no changes made.");
        });
    }

    let labels: Vec<String> = stale.iter().map(|wt| candidate_label(wt, root)).collect();
    let chosen = prompt.select_many("Select worktrees to remove", &labels)?;
    let selected: Vec<StaleWorktreeInfo> = chosen
        .into_iter()
        .filter_map(|i| stale.get(i).cloned())
        .collect();

    if selected.is_empty() {
        return session.output.aborted();
    }

    let dirty = selected
        .iter()
        .filter(|wt| wt.has_uncommitted_changes)
        .count();
    if args.force && dirty > 0 {
        let question = format!(
            "{} selected worktree(s) have uncommitted changes that will be lost. Continue?",
            dirty
        );
        if !prompt.confirm(&question)? {
            return session.output.aborted();
        }
    }

    let options = RemoveOptions {
        force: args.force,
        delete_branch: args.delete_branches,
        target_branch,
    };
    let result = lifecycle::remove_worktrees(&session.repo, &selected, &options);
    let outcome = batch_outcome(&result);

    let status: Status = result.status().into();
    report.removal = Some(result);
    session.output.result(status, report, |report| {
        if let Some(removal) = &report.removal {
            println!();
            print_batch(session, removal, "Removed");
        }
    })?;

    outcome
}
