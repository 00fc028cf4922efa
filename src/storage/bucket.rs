//! Bucket Store
//!
//! Owns the on-disk representation of buckets: one JSON object per bucket
//! file, mapping stringified `i64` keys to `i64` values.
//!
//! Every operation works on the whole file. `read` loads the full mapping,
//! `write` replaces it. Callers serialize access to a bucket by holding its
//! lock from [`LockRegistry`](super::LockRegistry) for the full
//! read-modify-write cycle.

use std::ffi::OsStr;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, ShardError};
use crate::hasher::BucketHasher;

use super::{Bucket, BUCKET_EXTENSION, TEMP_SUFFIX};

/// Reads and writes bucket files inside a table directory
#[derive(Debug, Clone)]
pub struct BucketStore {
    /// Directory holding the bucket files
    table_dir: PathBuf,
    /// Key → bucket id mapping
    hasher: BucketHasher,
}

impl BucketStore {
    pub fn new(table_dir: impl Into<PathBuf>, hasher: BucketHasher) -> Self {
        Self {
            table_dir: table_dir.into(),
            hasher,
        }
    }

    /// Path of the bucket file for `bucket_id` (no I/O)
    pub fn bucket_path(&self, bucket_id: &str) -> PathBuf {
        self.table_dir
            .join(format!("{}.{}", bucket_id, BUCKET_EXTENSION))
    }

    /// Path of the bucket file owning `key` (no I/O)
    pub fn path_for_key(&self, key: i64) -> PathBuf {
        self.bucket_path(&self.hasher.bucket_id(key))
    }

    /// Return the bucket's path, creating an empty bucket file if absent
    pub fn ensure_bucket(&self, bucket_id: &str) -> Result<PathBuf> {
        let path = self.bucket_path(bucket_id);
        self.ensure_path(&path)?;
        Ok(path)
    }

    /// Create an empty bucket at `path` unless one already exists
    ///
    /// Must be called with the bucket lock held.
    pub fn ensure_path(&self, path: &Path) -> Result<()> {
        if path.exists() {
            return Ok(());
        }
        tracing::debug!(bucket = %path.display(), "creating empty bucket");
        self.write(path, &Bucket::new())
    }

    /// Deserialize the bucket stored at `path`
    pub fn read(&self, path: &Path) -> Result<Bucket> {
        let bytes = fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(bucket = %path.display(), error = %e, "bucket file failed to parse");
            ShardError::CorruptBucket {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })
    }

    /// Serialize `bucket` to `path`, replacing any previous content
    ///
    /// The bytes go to a sibling temp file, which is synced to disk and then
    /// renamed over the target, so a crash mid-write never leaves a
    /// half-written bucket.
    pub fn write(&self, path: &Path, bucket: &Bucket) -> Result<()> {
        let bytes = serde_json::to_vec(bucket).map_err(std::io::Error::from)?;

        let mut temp_name = path.as_os_str().to_os_string();
        temp_name.push(TEMP_SUFFIX);
        let temp_path = PathBuf::from(temp_name);

        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }

        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    /// Look up `key` in the bucket stored at `path`
    pub fn get(&self, path: &Path, key: i64) -> Result<i64> {
        let bucket = self.read(path)?;
        bucket
            .get(&key)
            .copied()
            .ok_or(ShardError::KeyNotFound { key })
    }

    /// Insert or overwrite `key` in the bucket stored at `path`, then persist
    pub fn set(&self, path: &Path, key: i64, value: i64) -> Result<()> {
        let mut bucket = self.read(path)?;
        bucket.insert(key, value);
        self.write(path, &bucket)
    }

    /// All bucket files currently present in the table directory, sorted
    pub fn bucket_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.table_dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension() == Some(OsStr::new(BUCKET_EXTENSION)) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    pub fn table_dir(&self) -> &Path {
        &self.table_dir
    }

    pub fn hasher(&self) -> &BucketHasher {
        &self.hasher
    }
}
