//! CLI argument parsing for arbor.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Args, Parser, Subcommand};

/// Arbor: safe lifecycle management for git branches and worktrees.
///
/// - Backups are plain branches named `backup/<branch>/<YYYYMMDD-HHmmss>`
/// - Restores and deletions are refused when they would silently lose work
/// - Stale worktrees (merged, upstream gone, prunable) can be cleaned in bulk
#[derive(Parser, Debug)]
#[command(name = "arbor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Print results as a JSON envelope.
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for arbor.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create, list and delete backup branches.
    Backup(BackupCommand),

    /// Restore a branch to one of its backups.
    ///
    /// Without a backup name the newest backup of the branch is used.
    /// A branch checked out here is hard-reset; any other branch has its ref moved.
    Restore(RestoreArgs),

    /// Branch management commands.
    Branch(BranchCommand),

    /// Remove stale worktrees.
    ///
    /// A worktree is stale when its branch is merged into the target branch,
    /// its upstream is gone, or git considers it prunable.
    Clean(CleanArgs),

    /// Show the commits that differ between two refs.
    Compare(CompareArgs),
}

/// Backup subcommands.
#[derive(Args, Debug)]
pub struct BackupCommand {
    #[command(subcommand)]
    pub action: BackupAction,
}

#[derive(Subcommand, Debug)]
pub enum BackupAction {
    /// Back up a branch at its current commit.
    Create(BackupCreateArgs),

    /// List backups, newest first.
    List(BackupListArgs),

    /// Delete backup branches.
    Delete(BackupDeleteArgs),
}

/// Arguments for `backup create`.
#[derive(Args, Debug)]
pub struct BackupCreateArgs {
    /// Branch to back up (default: current branch).
    pub branch: Option<String>,

    /// Note stored with the backup.
    #[arg(short, long)]
    pub message: Option<String>,
}

/// Arguments for `backup list`.
#[derive(Args, Debug)]
pub struct BackupListArgs {
    /// Only list backups of this branch.
    pub branch: Option<String>,
}

/// Arguments for `backup delete`.
#[derive(Args, Debug)]
pub struct BackupDeleteArgs {
    /// Backup branch names.
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for `restore`.
#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Backup branch to restore from (default: newest backup of the branch).
    pub backup: Option<String>,

    /// Branch to restore (default: current branch).
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Restore even if the worktree has uncommitted changes.
    #[arg(short, long)]
    pub force: bool,

    /// Delete the backup after a successful restore.
    #[arg(long)]
    pub delete_backup: bool,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Branch subcommands.
#[derive(Args, Debug)]
pub struct BranchCommand {
    #[command(subcommand)]
    pub action: BranchAction,
}

#[derive(Subcommand, Debug)]
pub enum BranchAction {
    /// Delete branches, refusing unmerged or checked-out ones.
    Delete(BranchDeleteArgs),
}

/// Arguments for `branch delete`.
#[derive(Args, Debug)]
pub struct BranchDeleteArgs {
    /// Branches to delete.
    #[arg(required = true)]
    pub branches: Vec<String>,

    /// Delete unmerged branches and discard uncommitted worktree changes.
    #[arg(short, long)]
    pub force: bool,

    /// Also remove the worktree that has the branch checked out.
    #[arg(long)]
    pub remove_worktree: bool,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for `clean`.
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Branch that `merged` is measured against (default: config `target_branch`).
    #[arg(short, long)]
    pub target: Option<String>,

    /// Skip fetching with prune before classifying.
    #[arg(long)]
    pub no_fetch: bool,

    /// Remove every stale worktree without prompting.
    #[arg(short, long)]
    pub yes: bool,

    /// Remove worktrees with uncommitted changes.
    #[arg(short, long)]
    pub force: bool,

    /// Also delete the branch of each removed worktree.
    #[arg(long)]
    pub delete_branches: bool,

    /// Only list stale worktrees; remove nothing.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `compare`.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Base ref.
    pub from: String,

    /// Ref compared against the base.
    pub to: String,

    /// Commits shown per direction (default: config `commit_display_limit`).
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
