//! Batch execution of independent destructive operations.
//!
//! Items run strictly in input order. A failing item is recorded and the loop
//! moves on; items that already succeeded are never rolled back.

use crate::error::Result;
use serde::Serialize;

/// Outcome of one batch item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemResult {
    pub identifier: String,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Failure of a follow-up action on an item whose primary action succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl BatchItemResult {
    pub fn success(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            succeeded: true,
            error: None,
            warning: None,
        }
    }

    pub fn failure(identifier: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            succeeded: false,
            error: Some(error.into()),
            warning: None,
        }
    }
}

/// Overall status of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// Every item succeeded cleanly.
    Success,
    /// Every item succeeded, some with warnings.
    Warning,
    /// At least one item failed.
    Error,
}

/// Per-item outcomes plus aggregate counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub items: Vec<BatchItemResult>,
    pub succeeded_count: usize,
    pub failed_count: usize,
}

impl BatchResult {
    /// Build a result, counting successes and failures from `items`.
    pub fn from_items(items: Vec<BatchItemResult>) -> Self {
        let succeeded_count = items.iter().filter(|item| item.succeeded).count();
        let failed_count = items.len() - succeeded_count;
        Self {
            items,
            succeeded_count,
            failed_count,
        }
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn has_warnings(&self) -> bool {
        self.items.iter().any(|item| item.warning.is_some())
    }

    pub fn status(&self) -> BatchStatus {
        if self.failed_count > 0 {
            BatchStatus::Error
        } else if self.has_warnings() {
            BatchStatus::Warning
        } else {
            BatchStatus::Success
        }
    }

    pub fn failed(&self) -> impl Iterator<Item = &BatchItemResult> {
        self.items.iter().filter(|item| !item.succeeded)
    }
}

/// Run `action` on each target in order, isolating failures per item.
pub fn run_batch<T, I, A>(targets: &[T], identify: I, mut action: A) -> BatchResult
where
    I: Fn(&T) -> String,
    A: FnMut(&T) -> Result<()>,
{
    run_batch_with_followup(targets, identify, &mut action, |_: &T| Ok(()))
}

/// Like [`run_batch`], with a follow-up attempted only after the primary
/// action succeeds. A follow-up failure becomes a warning on a succeeded item.
pub fn run_batch_with_followup<T, I, A, F>(
    targets: &[T],
    identify: I,
    mut action: A,
    mut followup: F,
) -> BatchResult
where
    I: Fn(&T) -> String,
    A: FnMut(&T) -> Result<()>,
    F: FnMut(&T) -> Result<()>,
{
    let mut items = Vec::with_capacity(targets.len());

    for target in targets {
        let identifier = identify(target);

        if let Err(e) = action(target) {
            tracing::warn!(item = %identifier, error = %e, "batch item failed");
            items.push(BatchItemResult::failure(identifier, e.to_string()));
            continue;
        }

        let mut item = BatchItemResult::success(identifier);
        if let Err(e) = followup(target) {
            tracing::warn!(item = %item.identifier, error = %e, "follow-up action failed");
            item.warning = Some(e.to_string());
        } else {
            tracing::debug!(item = %item.identifier, "batch item succeeded");
        }
        items.push(item);
    }

    BatchResult::from_items(items)
}
