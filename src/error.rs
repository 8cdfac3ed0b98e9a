//! Error types for arbor.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//! Safety denials travel as values (`SafetyVerdict`) inside the engine and only
//! become an `ArborError::SafetyDenied` at the command boundary.

use crate::exit_codes;
use crate::safety::DenialReason;
use thiserror::Error;

/// Main error type for arbor operations.
#[derive(Error, Debug)]
pub enum ArborError {
    /// User provided invalid arguments or referenced something that does not exist.
    #[error("{0}")]
    UserError(String),

    /// A safety check refused the operation.
    #[error("{0}")]
    SafetyDenied(DenialReason),

    /// Git operation failed.
    #[error("Git operation failed: {0}")]
    GitError(String),

    /// Configuration could not be read or is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Prompting the user failed (no terminal, I/O error).
    #[error("Interaction failed: {0}")]
    Interaction(String),

    /// A batch finished with failed items.
    #[error("{failed} of {total} operation(s) failed")]
    PartialFailure { failed: usize, total: usize },

    /// An internal invariant was broken. Indicates a bug, never user input.
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
}

impl ArborError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ArborError::UserError(_) => exit_codes::USER_ERROR,
            ArborError::SafetyDenied(_) => exit_codes::SAFETY_DENIED,
            ArborError::GitError(_) => exit_codes::GIT_FAILURE,
            ArborError::Config(_) => exit_codes::USER_ERROR,
            ArborError::Interaction(_) => exit_codes::USER_ERROR,
            ArborError::PartialFailure { .. } => exit_codes::PARTIAL_FAILURE,
            ArborError::Invariant(_) => exit_codes::GIT_FAILURE,
        }
    }

    /// Stable machine-readable kind used in JSON failure payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            ArborError::UserError(_) => "user_error",
            ArborError::SafetyDenied(reason) => reason.kind(),
            ArborError::GitError(_) => "git_error",
            ArborError::Config(_) => "config_error",
            ArborError::Interaction(_) => "interaction_error",
            ArborError::PartialFailure { .. } => "partial_failure",
            ArborError::Invariant(_) => "internal_error",
        }
    }
}

impl From<DenialReason> for ArborError {
    fn from(reason: DenialReason) -> Self {
        ArborError::SafetyDenied(reason)
    }
}

/// Result type alias for arbor operations.
pub type Result<T> = std::result::Result<T, ArborError>;
