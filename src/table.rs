//! Table Module
//!
//! The persistent hash table that coordinates all components.
//!
//! ## Responsibilities
//! - Route each key to its bucket and hold that bucket's lock for the
//!   full read-modify-write cycle
//! - Append every successful set to the write-ahead log
//! - Rebuild a table from a log by replaying it in file order

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::config::{Config, LogSyncStrategy};
use crate::error::Result;
use crate::hasher::BucketHasher;
use crate::integer::{self, Integer};
use crate::storage::{BucketStore, LockRegistry};
use crate::wal::{LogEntry, LogRecovery, LogWriter, RecoveryResult, LOG_FILENAME};

/// A persistent integer → integer table stored in a directory
///
/// ## Concurrency Model: Per-Bucket Locking
///
/// - **Bucket access** (get/set): serialized per bucket by the lock the
///   registry hands out for the bucket's path
///   - Only ONE reader or writer inside a given bucket at a time
///   - Operations on different buckets run in parallel
///
/// - **Log appends**: serialized by the mutex around the `LogWriter`
///   - Taken only after the bucket lock is released
///   - Log order is completion order, not invocation order
///
/// No bucket contents are cached; every call re-reads the bucket file.
/// Share across threads with `Arc<Table>`.
pub struct Table {
    /// Table configuration
    config: Config,

    /// Bucket files inside `config.table_dir`
    store: BucketStore,

    /// One lock per bucket, allocated lazily
    locks: LockRegistry,

    /// Write-ahead log, absent when logging is disabled
    log: Option<Mutex<LogWriter>>,

    /// Path of the log file, when logging is enabled
    log_path: Option<PathBuf>,
}

impl Table {
    /// Open or create a table at `table_dir`
    ///
    /// An existing directory is reused as-is.
    pub fn open(table_dir: impl AsRef<Path>, enable_log: bool, bucket_mag: u32) -> Result<Self> {
        let config = Config::builder()
            .table_dir(table_dir.as_ref())
            .enable_log(enable_log)
            .bucket_mag(bucket_mag)
            .build();
        Self::open_with_config(config)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified table directory
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder().table_dir(path.as_ref()).build();
        Self::open_with_config(config)
    }

    /// Open or create a table with the given config
    pub fn open_with_config(config: Config) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.table_dir)?;

        let hasher = BucketHasher::new(config.bucket_mag);
        let store = BucketStore::new(&config.table_dir, hasher);

        let (log, log_path) = if config.enable_log {
            let path = config.table_dir.join(LOG_FILENAME);
            let writer = LogWriter::open(&path, config.log_sync_strategy)?;
            (Some(Mutex::new(writer)), Some(path))
        } else {
            (None, None)
        };

        tracing::debug!(
            table_dir = %config.table_dir.display(),
            bucket_mag = config.bucket_mag,
            log = config.enable_log,
            "opened table"
        );

        Ok(Self {
            config,
            store,
            locks: LockRegistry::new(),
            log,
            log_path,
        })
    }

    /// Get the value stored for `key`
    ///
    /// Fails with `KeyNotFound` if the key was never set, and with
    /// `TypeConstraint` (before any I/O) if `key` is not an integer.
    pub fn get<K: Integer>(&self, key: K) -> Result<i64> {
        let key = integer::checked("key", &key)?;
        let path = self.store.path_for_key(key);

        let lock = self.locks.lock_for(&path);
        let _guard = lock.lock();
        self.store.ensure_path(&path)?;
        self.store.get(&path, key)
    }

    /// Set `key` to `value`
    ///
    /// Steps:
    /// 1. Validate key and value (no side effects on failure)
    /// 2. Under the bucket lock: read bucket, insert, rewrite bucket
    /// 3. Release the bucket lock
    /// 4. Append the entry to the log under the log lock
    pub fn set<K: Integer, V: Integer>(&self, key: K, value: V) -> Result<()> {
        let key = integer::checked("key", &key)?;
        let value = integer::checked("value", &value)?;
        let path = self.store.path_for_key(key);

        {
            let lock = self.locks.lock_for(&path);
            let _guard = lock.lock();
            self.store.ensure_path(&path)?;
            self.store.set(&path, key, value)?;
        }

        if let Some(log) = &self.log {
            log.lock().append(&LogEntry::new(key, value))?;
        }

        Ok(())
    }

    /// Force the log to disk (no-op when logging is disabled)
    pub fn sync(&self) -> Result<()> {
        if let Some(log) = &self.log {
            log.lock().sync()?;
        }
        Ok(())
    }

    // =========================================================================
    // Replay
    // =========================================================================

    /// Build a fresh table at `table_dir` by replaying the log at `log_path`
    ///
    /// Any existing `table_dir` is removed first. The new table logs its own
    /// writes, so its log ends up with the same entries in the same order.
    pub fn rebuild_from_log(
        log_path: impl AsRef<Path>,
        table_dir: impl AsRef<Path>,
        bucket_mag: u32,
    ) -> Result<Self> {
        let config = Config::builder()
            .table_dir(table_dir.as_ref())
            .bucket_mag(bucket_mag)
            .build();
        let (table, _) = Self::rebuild_from_log_with_config(log_path, config)?;
        Ok(table)
    }

    /// Replay the log at `log_path` into a fresh table described by `config`
    ///
    /// Logging is always enabled on the rebuilt table. The source log is
    /// read and parsed in full before the destination is wiped, so a
    /// missing or malformed log leaves the destination untouched, and the
    /// source log may live inside the destination directory.
    pub fn rebuild_from_log_with_config(
        log_path: impl AsRef<Path>,
        mut config: Config,
    ) -> Result<(Self, RecoveryResult)> {
        let log_path = log_path.as_ref();
        config.enable_log = true;
        config.validate()?;

        let (entries, result) = LogRecovery::recover(log_path)?;

        tracing::info!(
            log = %log_path.display(),
            table_dir = %config.table_dir.display(),
            entries = result.entries_recovered,
            "replaying log"
        );

        if config.table_dir.exists() {
            fs::remove_dir_all(&config.table_dir)?;
        }
        fs::create_dir_all(&config.table_dir)?;

        let table = Self::open_with_config(config)?;
        for entry in &entries {
            table.set(entry.key, entry.value)?;
        }

        tracing::info!(
            entries = result.entries_recovered,
            distinct_keys = result.distinct_keys,
            "log replay complete"
        );

        Ok((table, result))
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Path of the log file, or `None` when logging is disabled
    pub fn log_file(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    /// Number of entries in the log, or `None` when logging is disabled
    pub fn log_len(&self) -> Option<u64> {
        self.log.as_ref().map(|log| log.lock().entry_count())
    }

    /// Get the table directory path
    pub fn table_dir(&self) -> &Path {
        &self.config.table_dir
    }

    pub fn bucket_mag(&self) -> u32 {
        self.config.bucket_mag
    }

    /// Bucket files currently on disk
    pub fn bucket_files(&self) -> Result<Vec<PathBuf>> {
        self.store.bucket_files()
    }

    /// Number of bucket locks allocated by this handle
    pub fn bucket_lock_count(&self) -> usize {
        self.locks.len()
    }

    pub fn log_sync_strategy(&self) -> LogSyncStrategy {
        self.config.log_sync_strategy
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("table_dir", &self.config.table_dir)
            .field("bucket_mag", &self.config.bucket_mag)
            .field("log_file", &self.log_path)
            .finish()
    }
}
