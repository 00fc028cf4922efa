//! WAL Reader
//!
//! Reads every entry of a log file, in file order.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

use super::LogEntry;

/// Reads entries from a log file
pub struct LogReader {
    path: PathBuf,
    contents: String,
}

impl LogReader {
    /// Load a log file into memory
    pub fn open(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            contents,
        })
    }

    /// Parse all entries
    ///
    /// Blank lines and surrounding whitespace are ignored, so a trailing
    /// newline at end of file is harmless. Any other malformed line fails
    /// the whole read.
    pub fn entries(&self) -> Result<Vec<LogEntry>> {
        self.contents
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .map(|(line_no, line)| LogEntry::parse(line, line_no))
            .collect()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
