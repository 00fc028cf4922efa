//! Configuration for ShardKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShardError};

/// Default number of hex digits used to pick a bucket (16^3 = 4096 buckets)
pub const DEFAULT_BUCKET_MAG: u32 = 3;

/// Largest usable bucket magnitude: the length of a hex SHA-256 digest
pub const MAX_BUCKET_MAG: u32 = 64;

/// Main configuration for a table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory of the table
    /// Internal structure:
    ///   {table_dir}/
    ///     ├── log.txt          (write-ahead log, when enabled)
    ///     └── <hex>.json       (one file per populated bucket)
    pub table_dir: PathBuf,

    /// Number of hex digits of the key hash used to select a bucket
    pub bucket_mag: u32,

    // -------------------------------------------------------------------------
    // WAL Configuration
    // -------------------------------------------------------------------------
    /// Append every successful set to `log.txt`
    pub enable_log: bool,

    /// Sync strategy: how often to fsync the log
    pub log_sync_strategy: LogSyncStrategy,
}

/// Log sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogSyncStrategy {
    /// Flush to the OS after every append, never fsync
    Flush,

    /// fsync after every append (safest, slowest)
    EveryWrite,

    /// fsync after N appends (balanced durability/performance)
    EveryNEntries { count: usize },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_dir: PathBuf::from("./shardkv_data"),
            bucket_mag: DEFAULT_BUCKET_MAG,
            enable_log: true,
            log_sync_strategy: LogSyncStrategy::Flush,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject parameters the table cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.bucket_mag == 0 || self.bucket_mag > MAX_BUCKET_MAG {
            return Err(ShardError::Config(format!(
                "bucket_mag must be in 1..={}, got {}",
                MAX_BUCKET_MAG, self.bucket_mag
            )));
        }
        if let LogSyncStrategy::EveryNEntries { count: 0 } = self.log_sync_strategy {
            return Err(ShardError::Config(
                "EveryNEntries sync count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the table directory
    pub fn table_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.table_dir = path.into();
        self
    }

    /// Set the bucket magnitude (bucket count = 16^bucket_mag)
    pub fn bucket_mag(mut self, bucket_mag: u32) -> Self {
        self.config.bucket_mag = bucket_mag;
        self
    }

    /// Enable or disable the write-ahead log
    pub fn enable_log(mut self, enable: bool) -> Self {
        self.config.enable_log = enable;
        self
    }

    /// Set the log sync strategy
    pub fn log_sync_strategy(mut self, strategy: LogSyncStrategy) -> Self {
        self.config.log_sync_strategy = strategy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
