//! Bucket hashing
//!
//! Maps a key to the bucket that owns it: the first `bucket_mag` hex digits
//! of the SHA-256 digest of the key's decimal representation. The hash is
//! unseeded, so the mapping is stable across processes and restarts.

use sha2::{Digest, Sha256};

/// Deterministic key → bucket id mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketHasher {
    bucket_mag: u32,
}

impl BucketHasher {
    /// Create a hasher using `bucket_mag` hex digits (16^bucket_mag buckets)
    pub fn new(bucket_mag: u32) -> Self {
        Self { bucket_mag }
    }

    /// Bucket id for `key`, e.g. `"5fe"` for key 0 with the default magnitude
    pub fn bucket_id(&self, key: i64) -> String {
        let digest = Sha256::digest(key.to_string().as_bytes());
        let mut id = hex::encode(digest);
        id.truncate(self.bucket_mag as usize);
        id
    }

    pub fn bucket_mag(&self) -> u32 {
        self.bucket_mag
    }

    /// Number of distinct bucket ids (saturates at `u64::MAX`)
    pub fn bucket_count(&self) -> u64 {
        16u64.saturating_pow(self.bucket_mag)
    }
}
