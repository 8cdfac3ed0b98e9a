//! Commit deltas between two refs.
//!
//! A bounded view over a read-only history query: at most `display_limit`
//! commits per direction, with the true total kept alongside so callers can
//! render "...and N more". Message truncation applies to display only; the
//! serialized form always carries full messages.

use crate::error::Result;
use crate::provider::HistoryQuery;
use serde::Serialize;

/// Default number of commits shown per direction.
pub const DEFAULT_DISPLAY_LIMIT: usize = 10;

/// Default display width for a commit message.
pub const DEFAULT_MESSAGE_WIDTH: usize = 72;

const ELLIPSIS: &str = "...";

/// One commit in a delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitLogEntry {
    pub hash: String,
    pub message: String,
}

/// Commits in one direction of a delta.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitDelta {
    /// Newest first, at most the display limit.
    pub commits: Vec<CommitLogEntry>,
    /// Number of commits in the range, independent of the limit.
    pub total_count: usize,
}

impl CommitDelta {
    /// Number of commits in the range that were not returned.
    pub fn remaining(&self) -> usize {
        self.total_count.saturating_sub(self.commits.len())
    }

    /// `...and N more` when the list was truncated.
    pub fn more_suffix(&self) -> Option<String> {
        match self.remaining() {
            0 => None,
            n => Some(format!("...and {} more", n)),
        }
    }

    /// Display lines: abbreviated hash plus truncated message, then the suffix.
    pub fn display_lines(&self, message_width: usize) -> Vec<String> {
        let mut lines: Vec<String> = self
            .commits
            .iter()
            .map(|c| {
                format!(
                    "{} {}",
                    abbreviate(&c.hash),
                    truncate_message(&c.message, message_width)
                )
            })
            .collect();
        lines.extend(self.more_suffix());
        lines
    }

    fn clamp(mut self, limit: usize) -> Self {
        self.commits.truncate(limit);
        self.total_count = self.total_count.max(self.commits.len());
        self
    }
}

/// Both directions of a delta between `from_ref` and `to_ref`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaReport {
    pub from_ref: String,
    pub to_ref: String,
    /// Commits reachable from `to_ref` but not `from_ref`.
    pub ahead: CommitDelta,
    /// Commits reachable from `from_ref` but not `to_ref`.
    pub behind: CommitDelta,
}

/// Compute both directions of the delta between `from_ref` and `to_ref`.
pub fn delta<H: HistoryQuery + ?Sized>(
    history: &H,
    from_ref: &str,
    to_ref: &str,
    display_limit: usize,
) -> Result<DeltaReport> {
    let ahead = one_way(history, to_ref, from_ref, display_limit)?;
    let behind = one_way(history, from_ref, to_ref, display_limit)?;

    Ok(DeltaReport {
        from_ref: from_ref.to_string(),
        to_ref: to_ref.to_string(),
        ahead,
        behind,
    })
}

/// Commits reachable from `reference` but not `excluding`, bounded by `display_limit`.
pub fn one_way<H: HistoryQuery + ?Sized>(
    history: &H,
    reference: &str,
    excluding: &str,
    display_limit: usize,
) -> Result<CommitDelta> {
    let delta = history.commits_reachable_only_from(reference, excluding, display_limit)?;
    Ok(delta.clamp(display_limit))
}

/// Cut `message` to `width` characters, ending in `...` when it was cut.
pub fn truncate_message(message: &str, width: usize) -> String {
    if message.chars().count() <= width {
        return message.to_string();
    }

    let keep = width.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = message.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Short form of a commit hash for display.
pub fn abbreviate(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}
