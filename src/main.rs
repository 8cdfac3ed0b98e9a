//! Arbor: safe lifecycle management for git branches and worktrees.
//!
//! This is the main entry point for the `arbor` CLI. It parses arguments,
//! dispatches to the appropriate command handler, and handles errors with
//! proper exit codes.

use arbor::cli::Cli;
use arbor::error::ArborError;
use arbor::output::Envelope;
use arbor::{commands, exit_codes, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init_tracing(cli.verbose);

    let json = cli.json;
    match commands::dispatch(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // A partial failure already printed its batch envelope.
            let reported = matches!(err, ArborError::PartialFailure { .. });
            if json && !reported {
                match Envelope::failure(&err).to_json() {
                    Ok(envelope) => println!("{}", envelope),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }

            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
