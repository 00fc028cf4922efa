//! WAL Writer
//!
//! Handles appending entries to the log file.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::LogSyncStrategy;
use crate::error::Result;

use super::LogEntry;

/// Appends entries to the log file
///
/// Not synchronized on its own; the table keeps it behind the log lock so
/// concurrent appends never interleave within a line.
pub struct LogWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    sync_strategy: LogSyncStrategy,
    /// Entries in the file, including those present before open
    entry_count: u64,
    entries_since_sync: usize,
    /// Existing content ends without a newline; terminate it before appending
    needs_newline: bool,
}

impl LogWriter {
    /// Open or create a log file in append mode
    ///
    /// The file is not modified by opening it.
    pub fn open(path: &Path, sync_strategy: LogSyncStrategy) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(path)?;
        let (entry_count, ends_with_newline) = Self::scan(&file)?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            sync_strategy,
            entry_count,
            entries_since_sync: 0,
            needs_newline: !ends_with_newline,
        })
    }

    /// Count non-blank lines and report whether the file ends in `\n`
    ///
    /// Works on raw bytes one line at a time, so content is never decoded
    /// and memory stays bounded by the longest line.
    fn scan(file: &File) -> Result<(u64, bool)> {
        let mut reader = BufReader::new(file);
        let mut line = Vec::new();
        let mut count = 0;
        let mut ends_with_newline = true;

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            ends_with_newline = line.last() == Some(&b'\n');
            if line.iter().any(|b| !b.is_ascii_whitespace()) {
                count += 1;
            }
        }

        Ok((count, ends_with_newline))
    }

    /// Append an entry; the line is flushed before this returns
    pub fn append(&mut self, entry: &LogEntry) -> Result<()> {
        if self.needs_newline {
            self.writer.write_all(b"\n")?;
            self.needs_newline = false;
        }
        self.writer.write_all(entry.encode().as_bytes())?;
        self.writer.flush()?;
        self.entry_count += 1;
        self.entries_since_sync += 1;

        match self.sync_strategy {
            LogSyncStrategy::Flush => {}
            LogSyncStrategy::EveryWrite => self.sync()?,
            LogSyncStrategy::EveryNEntries { count } => {
                if self.entries_since_sync >= count {
                    self.sync()?;
                }
            }
        }

        Ok(())
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        self.entries_since_sync = 0;
        Ok(())
    }

    /// Number of entries in the log file
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
