//! Implementation of `arbor branch delete`.

use super::Session;
use super::backup::print_batch;
use crate::cli::BranchDeleteArgs;
use crate::error::Result;
use crate::lifecycle;
use crate::output::batch_outcome;
use crate::provider::Confirmation;
use crate::safety::DeleteRequest;

pub fn cmd_branch_delete(
    session: &Session,
    args: BranchDeleteArgs,
    prompt: &dyn Confirmation,
) -> Result<()> {
    let requests: Vec<DeleteRequest> = args
        .branches
        .iter()
        .map(|branch| DeleteRequest {
            force: args.force,
            remove_worktree: args.remove_worktree,
            ..DeleteRequest::new(branch.as_str())
        })
        .collect();

    let mut question = format!("Delete {} branch(es)", requests.len());
    if args.remove_worktree {
        question.push_str(" and their worktrees");
    }
    question.push('?');
    if !prompt.confirm(&question)? {
        return session.output.aborted();
    }

    let result = lifecycle::delete_branches(&session.repo, &requests);
    print_batch(session, &result, "Deleted");
    batch_outcome(&result)
}
