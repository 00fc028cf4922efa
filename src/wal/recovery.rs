//! WAL Recovery
//!
//! Loads a log file for replay.

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, ShardError};

use super::{LogEntry, LogReader};

/// Loads the entries a replay needs
pub struct LogRecovery;

/// Result of a recovery operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecoveryResult {
    /// Number of entries read from the log
    pub entries_recovered: u64,

    /// Number of distinct keys among those entries
    pub distinct_keys: u64,
}

impl LogRecovery {
    /// Read every entry of the log at `path`
    ///
    /// Fails with `LogNotFound` when the file does not exist, and with
    /// `LogCorruption` on the first malformed line. Nothing is modified.
    pub fn recover(path: &Path) -> Result<(Vec<LogEntry>, RecoveryResult)> {
        if !path.is_file() {
            return Err(ShardError::LogNotFound(path.to_path_buf()));
        }

        let entries = LogReader::open(path)?.entries()?;
        let distinct_keys = entries
            .iter()
            .map(|entry| entry.key)
            .collect::<HashSet<_>>()
            .len() as u64;

        let result = RecoveryResult {
            entries_recovered: entries.len() as u64,
            distinct_keys,
        };
        Ok((entries, result))
    }
}
