//! Storage Module
//!
//! Hash-sharded bucket files plus the per-bucket locks that guard them.
//!
//! ## Responsibilities
//! - Map each key to exactly one bucket file
//! - Create buckets lazily as empty mappings
//! - Full-file read-modify-write of a bucket under its own lock
//!
//! ## Directory Layout
//! ```text
//! {table_dir}/
//!   ├── 000.json      {"-3":9,"17":4}
//!   ├── 5fe.json      {"0":12}
//!   ├── ...           (one file per populated bucket, 16^bucket_mag max)
//!   └── log.txt       (write-ahead log, see `wal`)
//! ```

mod bucket;
mod locks;

use std::collections::BTreeMap;

pub use bucket::BucketStore;
pub use locks::{BucketLock, LockRegistry};

/// In-memory contents of one bucket
pub type Bucket = BTreeMap<i64, i64>;

/// File extension of bucket files
pub const BUCKET_EXTENSION: &str = "json";

/// Suffix appended to a bucket path while it is being rewritten
pub const TEMP_SUFFIX: &str = ".tmp";
