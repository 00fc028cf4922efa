//! Bucket Lock Registry
//!
//! Hands out one mutex per bucket, allocated on first use.
//!
//! ## Concurrency:
//! - `locks`: the registry-wide guard; held only while looking up or
//!   inserting an entry, never while a bucket is being read or written
//! - Bucket mutexes are independent, so unrelated buckets never contend
//! - Entries are never removed, so every caller asking for the same path
//!   gets the same `Arc<Mutex<()>>`

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

/// Lock handle for a single bucket
pub type BucketLock = Arc<Mutex<()>>;

/// Lazily populated map from bucket path to that bucket's lock
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: Mutex<HashMap<PathBuf, BucketLock>>,
}

impl LockRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the lock for `bucket_path`, allocating it on first access
    ///
    /// Check-and-insert happens under the registry guard, so two threads
    /// racing on a new bucket always end up with the same lock.
    pub fn lock_for(&self, bucket_path: &Path) -> BucketLock {
        let mut locks = self.locks.lock();
        if let Some(lock) = locks.get(bucket_path) {
            return Arc::clone(lock);
        }

        tracing::trace!(bucket = %bucket_path.display(), "allocating bucket lock");
        let lock = BucketLock::default();
        locks.insert(bucket_path.to_path_buf(), Arc::clone(&lock));
        lock
    }

    /// Number of bucket locks allocated so far
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }
}
