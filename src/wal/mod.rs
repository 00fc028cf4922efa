//! Write-Ahead Log (WAL) Module
//!
//! Append-only record of every successful set, sufficient to rebuild a
//! table from nothing.
//!
//! ## Responsibilities
//! - Append one line per successful set, after the bucket write
//! - Never rewrite or drop entries (duplicates of a key accumulate)
//! - Parse a log back into entries for replay
//!
//! ## File Format
//! ```text
//! ┌──────────────────────┐
//! │ <key>,<value>\n      │  entry 1
//! │ <key>,<value>\n      │  entry 2
//! │ ...                  │
//! └──────────────────────┘
//! ```
//! UTF-8 text, decimal `i64` fields. Blank lines and trailing whitespace are
//! tolerated on read.

mod entry;
mod reader;
mod recovery;
mod writer;

pub use entry::{LogEntry, FIELD_SEPARATOR};
pub use reader::LogReader;
pub use recovery::{LogRecovery, RecoveryResult};
pub use writer::LogWriter;

/// File name of the log inside a table directory
pub const LOG_FILENAME: &str = "log.txt";
