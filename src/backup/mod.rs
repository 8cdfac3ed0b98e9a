//! Backup branch identities.
//!
//! Backups are plain branches named `backup/<source>/<YYYYMMDD-HHmmss>`; the name
//! is the only place the identity is stored. Decoding never fails loudly on
//! arbitrary branch names, it simply reports "not a backup".

mod age;
mod naming;

pub use age::relative_time;
pub use naming::{
    BACKUP_PREFIX, BackupIdentity, TIMESTAMP_FORMAT, decode, decode_checked, encode, is_backup_of,
};
