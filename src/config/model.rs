//! Config struct definition and default implementation.

use crate::delta::{DEFAULT_DISPLAY_LIMIT, DEFAULT_MESSAGE_WIDTH};
use serde::{Deserialize, Serialize};

/// File name of the per-repository config, relative to the repository root.
pub const CONFIG_FILE_NAME: &str = ".arbor.yaml";

/// Configuration for arbor.
///
/// This struct represents the contents of `.arbor.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Git settings
    // =========================================================================
    /// Branch that cleanup measures `merged` against (default: "main").
    pub target_branch: String,

    /// Remote fetched before cleanup (default: "origin").
    pub remote: String,

    /// Whether `clean` fetches with prune before classifying worktrees.
    pub fetch_before_cleanup: bool,

    // =========================================================================
    // Display settings
    // =========================================================================
    /// Maximum commits listed per direction in a delta.
    pub commit_display_limit: usize,

    /// Characters of a commit message shown before it is cut.
    pub message_width: usize,

    // =========================================================================
    // Restore settings
    // =========================================================================
    /// Delete the backup branch after a successful restore.
    pub delete_backup_after_restore: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_branch: "main".to_string(),
            remote: "origin".to_string(),
            fetch_before_cleanup: true,
            commit_display_limit: DEFAULT_DISPLAY_LIMIT,
            message_width: DEFAULT_MESSAGE_WIDTH,
            delete_backup_after_restore: false,
        }
    }
}
