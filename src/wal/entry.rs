//! WAL Entry definitions
//!
//! One entry per successful set, stored as a single text line.

use std::fmt;

use crate::error::{Result, ShardError};

/// Separator between key and value inside a line
pub const FIELD_SEPARATOR: char = ',';

/// A single entry in the WAL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogEntry {
    pub key: i64,
    pub value: i64,
}

impl LogEntry {
    pub fn new(key: i64, value: i64) -> Self {
        Self { key, value }
    }

    /// Encode as `<key>,<value>\n`
    pub fn encode(&self) -> String {
        format!("{}{}{}\n", self.key, FIELD_SEPARATOR, self.value)
    }

    /// Parse one line (without its newline)
    ///
    /// `line_no` is 1-based and only used for error reporting.
    pub fn parse(line: &str, line_no: usize) -> Result<Self> {
        let corrupt = |reason: String| ShardError::LogCorruption {
            line: line_no,
            reason,
        };

        let (key, value) = line
            .split_once(FIELD_SEPARATOR)
            .ok_or_else(|| corrupt(format!("missing separator in {:?}", line)))?;

        let key = key
            .trim()
            .parse()
            .map_err(|e| corrupt(format!("bad key {:?}: {}", key, e)))?;
        let value = value
            .trim()
            .parse()
            .map_err(|e| corrupt(format!("bad value {:?}: {}", value, e)))?;

        Ok(Self { key, value })
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.key, FIELD_SEPARATOR, self.value)
    }
}
