//! Machine-readable command output.
//!
//! Every command printed with `--json` produces one envelope:
//! `{"status": "ok" | "warning" | "error", "data": ..., "error": {...}}`.
//! Errors never cross this boundary as anything but a [`Failure`].

use crate::batch::{BatchResult, BatchStatus};
use crate::error::{ArborError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Overall outcome of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Warning,
    Error,
}

impl From<BatchStatus> for Status {
    fn from(status: BatchStatus) -> Self {
        match status {
            BatchStatus::Success => Status::Ok,
            BatchStatus::Warning => Status::Warning,
            BatchStatus::Error => Status::Error,
        }
    }
}

/// A structured failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
}

impl From<&ArborError> for Failure {
    fn from(err: &ArborError) -> Self {
        let mut context = BTreeMap::new();
        match err {
            ArborError::SafetyDenied(reason) => {
                if let Some((key, value)) = reason.context() {
                    context.insert(key.to_string(), value);
                }
            }
            ArborError::PartialFailure { failed, total } => {
                context.insert("failed".to_string(), failed.to_string());
                context.insert("total".to_string(), total.to_string());
            }
            _ => {}
        }

        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
            context,
        }
    }
}

/// The JSON envelope wrapped around every `--json` result.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Failure>,
}

impl<T: Serialize> Envelope<T> {
    pub fn with_status(status: Status, data: T) -> Self {
        Self {
            status,
            data: Some(data),
            error: None,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ArborError::Invariant(format!("failed to serialize output: {}", e)))
    }
}

impl Envelope<()> {
    pub fn failure(err: &ArborError) -> Self {
        Self {
            status: Status::Error,
            data: None,
            error: Some(Failure::from(err)),
        }
    }
}

impl Envelope<BatchResult> {
    /// Status follows the batch: any failed item is an error, any warning a warning.
    pub fn batch(result: BatchResult) -> Self {
        Self::with_status(result.status().into(), result)
    }
}

/// Convert a batch with failed items into the error the process exits with.
pub fn batch_outcome(result: &BatchResult) -> Result<()> {
    if result.failed_count > 0 {
        return Err(ArborError::PartialFailure {
            failed: result.failed_count,
            total: result.total(),
        });
    }
    Ok(())
}
