use crate::delta::{CommitDelta, CommitLogEntry};
use crate::error::{ArborError, Result};
use crate::provider::{
    Confirmation, HistoryQuery, RepositoryMutation, RepositoryQuery, WorktreeInfo,
};
use crate::safety::DenialReason;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub(crate) fn create_test_repo() -> TempDir {
    create_repo(CreateRepoOptions {
        commits: 1,
        add_origin_remote: false,
    })
}

pub(crate) fn create_test_repo_with_remote() -> TempDir {
    create_repo(CreateRepoOptions {
        commits: 2,
        add_origin_remote: true,
    })
}

/// Write `filename` and commit it on whatever is checked out in `repo_dir`.
pub(crate) fn commit_file(repo_dir: &Path, filename: &str, contents: &str, message: &str) {
    std::fs::write(repo_dir.join(filename), contents).unwrap();
    git(repo_dir, &["add", filename]);
    git(repo_dir, &["commit", "-m", message]);
}

/// Check out the existing `branch` in a new worktree at `worktree_path`.
pub(crate) fn add_worktree(repo_dir: &Path, worktree_path: &Path, branch: &str) {
    let worktree_str = worktree_path.to_string_lossy();
    git(repo_dir, &["worktree", "add", &worktree_str, branch]);
}

struct CreateRepoOptions {
    commits: usize,
    add_origin_remote: bool,
}

fn create_repo(opts: CreateRepoOptions) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path();

    git(path, &["init"]);
    // Deterministic default branch name across environments.
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);

    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);

    std::fs::write(path.join("README.md"), "# Test\n").unwrap();
    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);

    for i in 2..=opts.commits {
        commit_file(
            path,
            &format!("file{}.txt", i),
            &format!("File {}\n", i),
            &format!("Commit {}", i),
        );
    }

    if opts.add_origin_remote {
        // Remote pointing at itself, enough for fetch and upstream tracking.
        let path_str = path.to_string_lossy().to_string();
        git(path, &["remote", "add", "origin", &path_str]);
    }

    temp_dir
}

fn git(repo_dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .current_dir(repo_dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute git {}: {}", args.join(" "), e));

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "git {} failed (exit code {:?})\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            output.status.code(),
            stdout,
            stderr
        );
    }
}

/// A mutation attempted against a [`FakeRepo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MutationCall {
    CreateBranch { name: String, from: String },
    ForceUpdateBranch { name: String, commit: String },
    ResetHard { commit: String },
    DeleteBranch { name: String, force: bool },
    RemoveWorktree { path: PathBuf, force: bool },
    SetDescription { name: String, text: String },
    DeleteDescription { name: String },
    FetchPrune { remote: String },
}

#[derive(Debug, Default)]
struct FakeState {
    current_branch: Option<String>,
    branches: BTreeMap<String, String>,
    descriptions: BTreeMap<String, String>,
    merged: BTreeSet<(String, String)>,
    gone: BTreeSet<String>,
    dirty: BTreeSet<PathBuf>,
    worktrees: Vec<WorktreeInfo>,
    history: BTreeMap<(String, String), Vec<CommitLogEntry>>,
    failures: Vec<MutationCall>,
    calls: Vec<MutationCall>,
}

/// In-memory repository rooted at `/repo` with `main` checked out at `m0`.
///
/// Every mutation is recorded in [`FakeRepo::calls`], including ones that fail.
pub(crate) struct FakeRepo {
    root: PathBuf,
    state: RefCell<FakeState>,
}

impl FakeRepo {
    pub(crate) fn new() -> Self {
        let mut state = FakeState {
            current_branch: Some("main".to_string()),
            ..Default::default()
        };
        state.branches.insert("main".to_string(), "m0".to_string());
        Self {
            root: PathBuf::from("/repo"),
            state: RefCell::new(state),
        }
    }

    pub(crate) fn with_branch(self, name: &str, commit: &str) -> Self {
        self.state
            .borrow_mut()
            .branches
            .insert(name.to_string(), commit.to_string());
        self
    }

    pub(crate) fn detached(self) -> Self {
        self.state.borrow_mut().current_branch = None;
        self
    }

    pub(crate) fn with_worktree(self, path: &str, branch: Option<&str>) -> Self {
        {
            let mut state = self.state.borrow_mut();
            let head = branch
                .and_then(|b| state.branches.get(b).cloned())
                .unwrap_or_else(|| "d0".to_string());
            state.worktrees.push(WorktreeInfo {
                path: PathBuf::from(path),
                branch: branch.map(String::from),
                head,
                is_main: false,
                prunable: false,
            });
        }
        self
    }

    pub(crate) fn prunable(self, path: &str) -> Self {
        for wt in self.state.borrow_mut().worktrees.iter_mut() {
            if wt.path == Path::new(path) {
                wt.prunable = true;
            }
        }
        self
    }

    pub(crate) fn merged_into(self, branch: &str, target: &str) -> Self {
        self.state
            .borrow_mut()
            .merged
            .insert((branch.to_string(), target.to_string()));
        self
    }

    pub(crate) fn upstream_gone_for(self, branch: &str) -> Self {
        self.state.borrow_mut().gone.insert(branch.to_string());
        self
    }

    pub(crate) fn dirty(self, path: &str) -> Self {
        self.state.borrow_mut().dirty.insert(PathBuf::from(path));
        self
    }

    pub(crate) fn with_description(self, branch: &str, text: &str) -> Self {
        self.state
            .borrow_mut()
            .descriptions
            .insert(branch.to_string(), text.to_string());
        self
    }

    pub(crate) fn with_history(
        self,
        reference: &str,
        excluding: &str,
        commits: Vec<CommitLogEntry>,
    ) -> Self {
        self.state
            .borrow_mut()
            .history
            .insert((reference.to_string(), excluding.to_string()), commits);
        self
    }

    /// Make the given mutation fail with a git error.
    pub(crate) fn fail_when(self, call: MutationCall) -> Self {
        self.state.borrow_mut().failures.push(call);
        self
    }

    /// Move a branch without recording a mutation, as if commits were made on it.
    pub(crate) fn set_branch_commit(&self, name: &str, commit: &str) {
        self.state
            .borrow_mut()
            .branches
            .insert(name.to_string(), commit.to_string());
    }

    pub(crate) fn calls(&self) -> Vec<MutationCall> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn branch_commit(&self, name: &str) -> Option<String> {
        self.state.borrow().branches.get(name).cloned()
    }

    pub(crate) fn worktree_paths(&self) -> Vec<PathBuf> {
        self.state
            .borrow()
            .worktrees
            .iter()
            .map(|wt| wt.path.clone())
            .collect()
    }

    fn record(&self, call: MutationCall) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call.clone());
        if state.failures.contains(&call) {
            return Err(ArborError::GitError(format!("injected failure: {:?}", call)));
        }
        Ok(())
    }

    fn resolve(&self, reference: &str) -> Option<String> {
        let state = self.state.borrow();
        if reference == "HEAD" {
            return state.current_branch.clone();
        }
        Some(reference.to_string())
    }

    fn main_worktree(&self) -> WorktreeInfo {
        let state = self.state.borrow();
        let head = state
            .current_branch
            .as_ref()
            .and_then(|b| state.branches.get(b).cloned())
            .unwrap_or_else(|| "d0".to_string());
        WorktreeInfo {
            path: self.root.clone(),
            branch: state.current_branch.clone(),
            head,
            is_main: true,
            prunable: false,
        }
    }
}

impl RepositoryQuery for FakeRepo {
    fn worktree_root(&self) -> &Path {
        &self.root
    }

    fn is_repository(&self) -> bool {
        true
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.state.borrow().current_branch.clone())
    }

    fn branch_exists(&self, name: &str) -> Result<bool> {
        Ok(self.state.borrow().branches.contains_key(name))
    }

    fn commit_hash_of(&self, reference: &str) -> Result<String> {
        let branch = self.resolve(reference).unwrap_or_default();
        let state = self.state.borrow();
        if let Some(commit) = state.branches.get(&branch) {
            return Ok(commit.clone());
        }
        if state.branches.values().any(|commit| commit == reference) {
            return Ok(reference.to_string());
        }
        Err(ArborError::GitError(format!(
            "unknown revision '{}'",
            reference
        )))
    }

    fn is_branch_merged(&self, branch: &str, target: &str) -> Result<bool> {
        let Some(target) = self.resolve(target) else {
            return Ok(false);
        };
        let state = self.state.borrow();
        if state.merged.contains(&(branch.to_string(), target.clone())) {
            return Ok(true);
        }
        let same_commit = match (state.branches.get(branch), state.branches.get(&target)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        };
        Ok(same_commit)
    }

    fn has_uncommitted_changes(&self, path: &Path) -> Result<bool> {
        Ok(self.state.borrow().dirty.contains(path))
    }

    fn find_worktree_checking_out_branch(&self, branch: &str) -> Result<Option<WorktreeInfo>> {
        Ok(self
            .list_worktrees()?
            .into_iter()
            .find(|wt| wt.branch.as_deref() == Some(branch)))
    }

    fn list_worktrees(&self) -> Result<Vec<WorktreeInfo>> {
        let mut worktrees = vec![self.main_worktree()];
        worktrees.extend(self.state.borrow().worktrees.iter().cloned());
        Ok(worktrees)
    }

    fn upstream_gone(&self, branch: &str) -> Result<bool> {
        Ok(self.state.borrow().gone.contains(branch))
    }

    fn list_branches(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .state
            .borrow()
            .branches
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn branch_description(&self, name: &str) -> Result<Option<String>> {
        Ok(self.state.borrow().descriptions.get(name).cloned())
    }
}

impl RepositoryMutation for FakeRepo {
    fn create_branch(&self, name: &str, from_ref: &str) -> Result<()> {
        self.record(MutationCall::CreateBranch {
            name: name.to_string(),
            from: from_ref.to_string(),
        })?;
        if self.branch_exists(name)? {
            return Err(ArborError::GitError(format!(
                "a branch named '{}' already exists",
                name
            )));
        }
        let commit = self.commit_hash_of(from_ref)?;
        self.state
            .borrow_mut()
            .branches
            .insert(name.to_string(), commit);
        Ok(())
    }

    fn force_update_branch(&self, name: &str, to_commit: &str) -> Result<()> {
        self.record(MutationCall::ForceUpdateBranch {
            name: name.to_string(),
            commit: to_commit.to_string(),
        })?;
        self.state
            .borrow_mut()
            .branches
            .insert(name.to_string(), to_commit.to_string());
        Ok(())
    }

    fn reset_hard_current_branch(&self, to_commit: &str) -> Result<()> {
        self.record(MutationCall::ResetHard {
            commit: to_commit.to_string(),
        })?;
        let mut state = self.state.borrow_mut();
        let Some(current) = state.current_branch.clone() else {
            return Err(ArborError::GitError("HEAD is detached".to_string()));
        };
        state.branches.insert(current, to_commit.to_string());
        state.dirty.remove(&self.root);
        Ok(())
    }

    fn delete_branch(&self, name: &str, force: bool) -> Result<()> {
        self.record(MutationCall::DeleteBranch {
            name: name.to_string(),
            force,
        })?;
        if !self.branch_exists(name)? {
            return Err(ArborError::GitError(format!(
                "branch '{}' not found",
                name
            )));
        }
        if self.find_worktree_checking_out_branch(name)?.is_some() {
            return Err(ArborError::GitError(format!(
                "cannot delete branch '{}' used by a worktree",
                name
            )));
        }
        if !force && !self.is_branch_merged(name, "HEAD")? {
            return Err(ArborError::SafetyDenied(DenialReason::NotMerged(
                name.to_string(),
            )));
        }
        self.state.borrow_mut().branches.remove(name);
        Ok(())
    }

    fn remove_worktree(&self, path: &Path, force: bool) -> Result<()> {
        self.record(MutationCall::RemoveWorktree {
            path: path.to_path_buf(),
            force,
        })?;
        let mut state = self.state.borrow_mut();
        let Some(index) = state.worktrees.iter().position(|wt| wt.path == path) else {
            return Err(ArborError::GitError(format!(
                "'{}' is not a working tree",
                path.display()
            )));
        };
        if !force && !state.worktrees[index].prunable && state.dirty.contains(path) {
            return Err(ArborError::GitError(format!(
                "'{}' contains modified or untracked files",
                path.display()
            )));
        }
        state.worktrees.remove(index);
        state.dirty.remove(path);
        Ok(())
    }

    fn set_branch_description(&self, name: &str, text: &str) -> Result<()> {
        self.record(MutationCall::SetDescription {
            name: name.to_string(),
            text: text.to_string(),
        })?;
        self.state
            .borrow_mut()
            .descriptions
            .insert(name.to_string(), text.to_string());
        Ok(())
    }

    fn delete_branch_description(&self, name: &str) -> Result<()> {
        self.record(MutationCall::DeleteDescription {
            name: name.to_string(),
        })?;
        self.state.borrow_mut().descriptions.remove(name);
        Ok(())
    }

    fn fetch_prune(&self, remote: &str) -> Result<()> {
        self.record(MutationCall::FetchPrune {
            remote: remote.to_string(),
        })
    }
}

impl HistoryQuery for FakeRepo {
    fn commits_reachable_only_from(
        &self,
        reference: &str,
        excluding: &str,
        limit: usize,
    ) -> Result<CommitDelta> {
        let state = self.state.borrow();
        let commits = state
            .history
            .get(&(reference.to_string(), excluding.to_string()))
            .cloned()
            .unwrap_or_default();
        Ok(CommitDelta {
            total_count: commits.len(),
            commits: commits.into_iter().take(limit).collect(),
        })
    }
}

/// Confirmation with canned answers that remembers every prompt it was shown.
pub(crate) struct ScriptedConfirmation {
    answer: bool,
    selection: Vec<usize>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedConfirmation {
    pub(crate) fn answering(answer: bool) -> Self {
        Self {
            answer,
            selection: Vec::new(),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn selecting(mut self, selection: Vec<usize>) -> Self {
        self.selection = selection;
        self
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl Confirmation for ScriptedConfirmation {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        self.prompts.borrow_mut().push(prompt.to_string());
        Ok(self.answer)
    }

    fn select_many(&self, prompt: &str, choices: &[String]) -> Result<Vec<usize>> {
        self.prompts.borrow_mut().push(prompt.to_string());
        Ok(self
            .selection
            .iter()
            .copied()
            .filter(|&i| i < choices.len())
            .collect())
    }
}
