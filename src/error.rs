//! Error types for ShardKV
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using ShardError
pub type Result<T> = std::result::Result<T, ShardError>;

/// Unified error type for ShardKV operations
#[derive(Debug, Error)]
pub enum ShardError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Table Errors
    // -------------------------------------------------------------------------
    #[error("Key not found: {key}")]
    KeyNotFound { key: i64 },

    #[error("Type constraint violated: {what} {repr} is not a representable integer")]
    TypeConstraint { what: &'static str, repr: String },

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Corrupt bucket {}: {reason}", .path.display())]
    CorruptBucket { path: PathBuf, reason: String },

    // -------------------------------------------------------------------------
    // WAL Errors
    // -------------------------------------------------------------------------
    #[error("Log not found: {}", .0.display())]
    LogNotFound(PathBuf),

    #[error("Log corruption at line {line}: {reason}")]
    LogCorruption { line: usize, reason: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ShardError {
    /// True for the recoverable "never written" case
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, ShardError::KeyNotFound { .. })
    }
}
