//! Implementation of `arbor compare`.

use super::Session;
use crate::cli::CompareArgs;
use crate::delta::{self, CommitDelta};
use crate::error::{ArborError, Result};
use crate::output::Status;

pub fn cmd_compare(session: &Session, args: CompareArgs) -> Result<()> {
    let limit = args.limit.unwrap_or(session.config.commit_display_limit);
    if limit == 0 {
        return Err(ArborError::UserError(
            "--limit must be at least 1".to_string(),
        ));
    }

    let report = delta::delta(&session.repo, &args.from, &args.to, limit)?;
    let width = session.config.message_width;

    session.output.result(Status::Ok, report, |report| {
        println!(
            "'{}' is {} ahead, {} behind '{}'",
            report.to_ref, report.ahead.total_count, report.behind.total_count, report.from_ref
        );
        print_direction("Ahead", &report.ahead, width);
        print_direction("Behind", &report.behind, width);
    })
}

fn print_direction(heading: &str, delta: &CommitDelta, width: usize) {
    if delta.total_count == 0 {
        return;
    }
    println!();
    println!("{}:", heading);
    for line in delta.display_lines(width) {
        println!("  {}", line);
    }
}
