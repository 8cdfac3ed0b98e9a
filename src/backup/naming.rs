//! Backup branch naming: `backup/<source-branch>/<YYYYMMDD-HHmmss>`.
//!
//! The source branch may itself contain `/` (`feature/auth`), so decoding always
//! takes the *last* path segment as the timestamp.

use crate::error::{ArborError, Result};
use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// Prefix shared by every backup branch.
pub const BACKUP_PREFIX: &str = "backup/";

/// `chrono` format of the trailing timestamp segment (UTC, second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

static TIMESTAMP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(\d{2})(\d{2})-(\d{2})(\d{2})(\d{2})$")
        .expect("Invalid backup timestamp regex")
});

/// The decoded parts of a backup branch name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupIdentity {
    /// Branch the backup was taken from.
    pub source_branch: String,
    /// When the backup was taken, truncated to the second.
    pub instant: DateTime<Utc>,
}

impl BackupIdentity {
    /// Build an identity, dropping sub-second precision from `instant`.
    pub fn new(source_branch: impl Into<String>, instant: DateTime<Utc>) -> Self {
        Self {
            source_branch: source_branch.into(),
            instant: instant.trunc_subsecs(0),
        }
    }

    /// The serialized branch name.
    pub fn branch_name(&self) -> String {
        encode(&self.source_branch, self.instant)
    }

    /// The trailing `YYYYMMDD-HHmmss` segment.
    pub fn timestamp(&self) -> String {
        self.instant.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Encode a source branch and instant into a backup branch name.
pub fn encode(source_branch: &str, instant: DateTime<Utc>) -> String {
    format!(
        "{}{}/{}",
        BACKUP_PREFIX,
        source_branch,
        instant.format(TIMESTAMP_FORMAT)
    )
}

/// Decode a backup branch name.
///
/// Returns `None` for anything that is not a well-formed backup name: wrong
/// prefix, no timestamp segment, an empty source branch, a timestamp that does
/// not match `YYYYMMDD-HHmmss`, or digits that are not a real calendar instant.
pub fn decode(name: &str) -> Option<BackupIdentity> {
    let rest = name.strip_prefix(BACKUP_PREFIX)?;
    let (source_branch, timestamp) = rest.rsplit_once('/')?;
    if source_branch.is_empty() {
        return None;
    }

    let instant = parse_timestamp(timestamp)?;
    Some(BackupIdentity {
        source_branch: source_branch.to_string(),
        instant,
    })
}

fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    let caps = TIMESTAMP_REGEX.captures(timestamp)?;
    let field = |i: usize| caps.get(i)?.as_str().parse::<u32>().ok();

    let year = i32::try_from(field(1)?).ok()?;
    let date = NaiveDate::from_ymd_opt(year, field(2)?, field(3)?)?;
    let datetime = date.and_hms_opt(field(4)?, field(5)?, field(6)?)?;
    Some(datetime.and_utc())
}

/// True iff `name` decodes as a backup whose source is exactly `expected_source_branch`.
pub fn is_backup_of(name: &str, expected_source_branch: &str) -> bool {
    decode(name).is_some_and(|identity| identity.source_branch == expected_source_branch)
}

/// Decode `name` and check that re-encoding reproduces it exactly.
///
/// A mismatch means the codec itself is broken, so it is reported as an
/// invariant violation instead of being treated as "not a backup".
pub fn decode_checked(name: &str) -> Result<Option<BackupIdentity>> {
    let Some(identity) = decode(name) else {
        return Ok(None);
    };

    let reencoded = identity.branch_name();
    if reencoded != name {
        tracing::error!(name, reencoded = %reencoded, "backup name does not round-trip");
        return Err(ArborError::Invariant(format!(
            "backup name '{}' decoded but re-encoded as '{}'",
            name, reencoded
        )));
    }
    Ok(Some(identity))
}
