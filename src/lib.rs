//! # ShardKV
//!
//! A minimal embedded persistent key-value store with:
//! - Integer keys and values
//! - Data sharded by key hash across up to 16^bucket_mag bucket files
//! - Per-bucket locking for concurrent readers and writers
//! - A write-ahead log that can rebuild the whole table on its own
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Table::get / set                        │
//! │              (validate key/value as integers)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐
//!               │ BucketHasher  │  sha256(key)[..bucket_mag]
//!               └───────┬───────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐
//!               │ LockRegistry  │  one mutex per bucket
//!               └───────┬───────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐      ┌─────────────┐
//!               │  BucketStore  │ ───▶ │     WAL     │
//!               │ (<hex>.json)  │ set  │  (log.txt)  │
//!               └───────────────┘      └──────┬──────┘
//!                                             │
//!                                             ▼
//!                                  Table::rebuild_from_log
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use shardkv::Table;
//!
//! # fn main() -> shardkv::Result<()> {
//! let table = Table::open("./my_table", true, 3)?;
//! table.set(42, 7)?;
//! assert_eq!(table.get(42)?, 7);
//!
//! let copy = Table::rebuild_from_log("./my_table/log.txt", "./my_table_copy", 3)?;
//! assert_eq!(copy.get(42)?, 7);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod integer;

pub mod hasher;
pub mod storage;
pub mod wal;
pub mod table;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ShardError, Result};
pub use config::{Config, LogSyncStrategy};
pub use integer::Integer;
pub use table::Table;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ShardKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
