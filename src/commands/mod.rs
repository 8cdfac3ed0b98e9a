//! Command implementations for arbor.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Every handler receives a [`Session`] (repository, config,
//! output mode) and a [`Confirmation`] already chosen from the `--yes` flag, so
//! handlers can be driven from tests against a real temporary repository.

mod backup;
mod branch;
mod clean;
mod compare;
mod prompt;
mod restore;

use crate::cli::{BackupAction, BranchAction, Cli, Command};
use crate::config::Config;
use crate::error::{ArborError, Result};
use crate::output::{Envelope, Status};
use crate::provider::{Confirmation, GitRepository};
use serde::Serialize;
use std::path::Path;

pub use prompt::{AutoConfirm, TerminalPrompt};

/// Everything a command handler needs besides its own arguments.
pub struct Session {
    pub repo: GitRepository,
    pub config: Config,
    pub output: Output,
}

impl Session {
    /// Discover the repository containing `cwd` and load its config.
    pub fn open<P: AsRef<Path>>(cwd: P, json: bool) -> Result<Self> {
        let repo = GitRepository::discover(cwd)?;
        let config = Config::load_for_repo(repo.root())?;
        Ok(Self {
            repo,
            config,
            output: Output { json },
        })
    }
}

/// Where results go: human text on stdout, or one JSON envelope on stdout with
/// progress text moved to stderr.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    /// Informational text. Goes to stderr in JSON mode to keep stdout parseable.
    pub fn info(&self, line: &str) {
        if self.json {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    pub fn warn(&self, line: &str) {
        eprintln!("Warning: {}", line);
    }

    /// Print `data` as an envelope in JSON mode, or run `human` otherwise.
    pub fn result<T: Serialize>(
        &self,
        status: Status,
        data: T,
        human: impl FnOnce(&T),
    ) -> Result<()> {
        if self.json {
            println!("{}", Envelope::with_status(status, data).to_json()?);
        } else {
            human(&data);
        }
        Ok(())
    }

    /// Report that the user declined; nothing was changed.
    pub fn aborted(&self) -> Result<()> {
        self.result(Status::Ok, Aborted { aborted: true }, |_| println!("Aborted."))
    }
}

#[derive(Serialize)]
struct Aborted {
    aborted: bool,
}

fn confirmation(yes: bool) -> Box<dyn Confirmation> {
    if yes {
        Box::new(AutoConfirm)
    } else {
        Box::new(TerminalPrompt::new())
    }
}

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().map_err(|e| {
        ArborError::UserError(format!("failed to read current directory: {}", e))
    })?;
    let session = Session::open(&cwd, cli.json)?;

    match cli.command {
        Command::Backup(cmd) => match cmd.action {
            BackupAction::Create(args) => backup::cmd_backup_create(&session, args),
            BackupAction::List(args) => backup::cmd_backup_list(&session, args),
            BackupAction::Delete(args) => {
                let prompt = confirmation(args.yes);
                backup::cmd_backup_delete(&session, args, prompt.as_ref())
            }
        },
        Command::Restore(args) => {
            let prompt = confirmation(args.yes);
            restore::cmd_restore(&session, args, prompt.as_ref())
        }
        Command::Branch(cmd) => match cmd.action {
            BranchAction::Delete(args) => {
                let prompt = confirmation(args.yes);
                branch::cmd_branch_delete(&session, args, prompt.as_ref())
            }
        },
        Command::Clean(args) => {
            let prompt = confirmation(args.yes);
            clean::cmd_clean(&session, args, prompt.as_ref())
        }
        Command::Compare(args) => compare::cmd_compare(&session, args),
    }
}
