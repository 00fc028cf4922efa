//! Tests for Table
//!
//! These tests verify:
//! - Opening (fresh and existing directories, config validation)
//! - get/set semantics and error cases
//! - Logging enabled vs disabled
//! - Corrupt bucket handling and lock release on failure
//! - Concurrent access patterns

use std::fs;
use std::sync::Arc;
use std::thread;

use shardkv::config::{Config, LogSyncStrategy};
use shardkv::hasher::BucketHasher;
use shardkv::{ShardError, Table};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_table() -> (TempDir, Table) {
    let temp_dir = TempDir::new().unwrap();
    let table = Table::open(temp_dir.path(), true, 3).unwrap();
    (temp_dir, table)
}

fn log_contents(table: &Table) -> String {
    fs::read_to_string(table.log_file().unwrap()).unwrap()
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_creates_nested_directory() {
    let temp_dir = TempDir::new().unwrap();
    let table_dir = temp_dir.path().join("a").join("b").join("table");

    let table = Table::open(&table_dir, true, 3).unwrap();

    assert!(table_dir.is_dir());
    assert!(table_dir.join("log.txt").exists());
    assert_eq!(table.table_dir(), table_dir);
    assert_eq!(table.bucket_mag(), 3);
}

#[test]
fn test_open_without_log() {
    let temp_dir = TempDir::new().unwrap();

    let table = Table::open(temp_dir.path(), false, 3).unwrap();
    table.set(1, 2).unwrap();

    assert_eq!(table.get(1).unwrap(), 2);
    assert_eq!(table.log_file(), None);
    assert_eq!(table.log_len(), None);
    assert!(!temp_dir.path().join("log.txt").exists());
    table.sync().unwrap();
}

#[test]
fn test_open_path_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();

    let table = Table::open_path(temp_dir.path()).unwrap();

    assert_eq!(table.bucket_mag(), 3);
    assert!(table.log_file().is_some());
    assert_eq!(table.log_sync_strategy(), LogSyncStrategy::Flush);
}

#[test]
fn test_open_rejects_invalid_bucket_mag() {
    let temp_dir = TempDir::new().unwrap();

    assert!(matches!(
        Table::open(temp_dir.path(), true, 0),
        Err(ShardError::Config(_))
    ));
    assert!(matches!(
        Table::open(temp_dir.path(), true, 65),
        Err(ShardError::Config(_))
    ));
}

#[test]
fn test_open_with_config_accessors() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .table_dir(temp_dir.path())
        .bucket_mag(2)
        .log_sync_strategy(LogSyncStrategy::EveryWrite)
        .build();

    let table = Table::open_with_config(config).unwrap();

    assert_eq!(table.table_dir(), temp_dir.path());
    assert_eq!(table.bucket_mag(), 2);
    assert_eq!(table.config().log_sync_strategy, LogSyncStrategy::EveryWrite);
    assert_eq!(table.log_len(), Some(0));
}

#[test]
fn test_open_reuses_existing_log() {
    let temp_dir = TempDir::new().unwrap();
    {
        let table = Table::open(temp_dir.path(), true, 3).unwrap();
        table.set(1, 10).unwrap();
        table.set(2, 20).unwrap();
    }

    let table = Table::open(temp_dir.path(), true, 3).unwrap();
    assert_eq!(table.log_len(), Some(2));

    table.set(3, 30).unwrap();
    assert_eq!(table.log_len(), Some(3));
    assert_eq!(log_contents(&table), "1,10\n2,20\n3,30\n");
}

#[test]
fn test_open_with_non_utf8_log() {
    let temp_dir = TempDir::new().unwrap();
    {
        let table = Table::open(temp_dir.path(), true, 2).unwrap();
        table.set(1, 10).unwrap();
    }
    let log_path = temp_dir.path().join("log.txt");
    let mut bytes = fs::read(&log_path).unwrap();
    bytes.extend_from_slice(b"\xff\n");
    fs::write(&log_path, &bytes).unwrap();

    let table = Table::open(temp_dir.path(), true, 2).unwrap();

    assert_eq!(table.get(1).unwrap(), 10);
    assert_eq!(table.log_len(), Some(2));
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_set_get() {
    let (_temp, table) = setup_temp_table();

    table.set(42, 7).unwrap();

    assert_eq!(table.get(42).unwrap(), 7);
}

#[test]
fn test_get_nonexistent_key() {
    let (_temp, table) = setup_temp_table();

    let err = table.get(99).unwrap_err();

    assert!(err.is_key_not_found());
    assert!(matches!(err, ShardError::KeyNotFound { key: 99 }));
}

#[test]
fn test_get_missing_key_in_populated_bucket() {
    let temp_dir = TempDir::new().unwrap();
    // 16 buckets, 200 keys: the lookup lands in a bucket that has data
    let table = Table::open(temp_dir.path(), true, 1).unwrap();
    for i in 0..200 {
        table.set(i, i * 10).unwrap();
    }

    assert!(matches!(
        table.get(1000),
        Err(ShardError::KeyNotFound { key: 1000 })
    ));
}

#[test]
fn test_set_overwrite() {
    let (_temp, table) = setup_temp_table();

    table.set(5, 1).unwrap();
    table.set(5, 2).unwrap();

    assert_eq!(table.get(5).unwrap(), 2);
    assert_eq!(log_contents(&table), "5,1\n5,2\n");
}

#[test]
fn test_extreme_values() {
    let (_temp, table) = setup_temp_table();

    table.set(i64::MIN, i64::MAX).unwrap();
    table.set(i64::MAX, i64::MIN).unwrap();
    table.set(0, -1).unwrap();

    assert_eq!(table.get(i64::MIN).unwrap(), i64::MAX);
    assert_eq!(table.get(i64::MAX).unwrap(), i64::MIN);
    assert_eq!(table.get(0).unwrap(), -1);
}

#[test]
fn test_accepts_other_integer_types() {
    let (_temp, table) = setup_temp_table();

    table.set(3u8, 4u64).unwrap();
    table.set("17", 2.0).unwrap();
    table.set(String::from("-5"), -6i16).unwrap();

    assert_eq!(table.get(3).unwrap(), 4);
    assert_eq!(table.get(17u32).unwrap(), 2);
    assert_eq!(table.get("-5").unwrap(), -6);
}

#[test]
fn test_bucket_file_layout() {
    let (temp, table) = setup_temp_table();

    table.set(0, 12).unwrap();

    let bucket = temp.path().join(format!("{}.json", BucketHasher::new(3).bucket_id(0)));
    assert_eq!(bucket, temp.path().join("5fe.json"));
    assert_eq!(fs::read_to_string(&bucket).unwrap(), r#"{"0":12}"#);
    assert_eq!(table.bucket_files().unwrap(), vec![bucket]);
}

#[test]
fn test_get_creates_empty_bucket() {
    let (temp, table) = setup_temp_table();

    assert!(table.get(0).is_err());

    let bucket = temp.path().join("5fe.json");
    assert_eq!(fs::read_to_string(bucket).unwrap(), "{}");
    assert_eq!(table.log_len(), Some(0));
}

// =============================================================================
// Type Constraint Tests
// =============================================================================

#[test]
fn test_invalid_key_has_no_side_effects() {
    let (temp, table) = setup_temp_table();

    let err = table.set("not a number", 1).unwrap_err();

    assert!(matches!(err, ShardError::TypeConstraint { what: "key", .. }));
    assert!(table.bucket_files().unwrap().is_empty());
    assert_eq!(table.log_len(), Some(0));
    assert_eq!(fs::read_to_string(temp.path().join("log.txt")).unwrap(), "");
}

#[test]
fn test_invalid_value_has_no_side_effects() {
    let (_temp, table) = setup_temp_table();
    table.set(1, 1).unwrap();

    assert!(matches!(
        table.set(1, u64::MAX),
        Err(ShardError::TypeConstraint { what: "value", .. })
    ));
    assert!(matches!(
        table.set(1, f64::NAN),
        Err(ShardError::TypeConstraint { what: "value", .. })
    ));

    assert_eq!(table.get(1).unwrap(), 1);
    assert_eq!(log_contents(&table), "1,1\n");
}

#[test]
fn test_invalid_get_key() {
    let (_temp, table) = setup_temp_table();

    assert!(matches!(
        table.get("1.5"),
        Err(ShardError::TypeConstraint { what: "key", .. })
    ));
    assert!(table.bucket_files().unwrap().is_empty());
}

// =============================================================================
// Corrupt Bucket Tests
// =============================================================================

#[test]
fn test_corrupt_bucket_is_reported() {
    let (temp, table) = setup_temp_table();
    table.set(0, 1).unwrap();

    let bucket = temp.path().join("5fe.json");
    fs::write(&bucket, "not json").unwrap();

    assert!(matches!(table.get(0), Err(ShardError::CorruptBucket { .. })));
    assert!(matches!(table.set(0, 2), Err(ShardError::CorruptBucket { .. })));

    // Failed set never reaches the log, and the file is left for inspection
    assert_eq!(log_contents(&table), "0,1\n");
    assert_eq!(fs::read_to_string(&bucket).unwrap(), "not json");
}

#[test]
fn test_corrupt_bucket_releases_lock() {
    let (temp, table) = setup_temp_table();
    table.set(0, 1).unwrap();

    let bucket = temp.path().join("5fe.json");
    fs::write(&bucket, "[1, 2]").unwrap();
    assert!(table.get(0).is_err());

    // Same bucket is usable again once repaired
    fs::write(&bucket, "{}").unwrap();
    assert!(matches!(table.get(0), Err(ShardError::KeyNotFound { .. })));
    table.set(0, 3).unwrap();
    assert_eq!(table.get(0).unwrap(), 3);
}

#[test]
fn test_non_integer_bucket_values_are_corrupt() {
    let (temp, table) = setup_temp_table();

    fs::write(temp.path().join("5fe.json"), r#"{"0":"x"}"#).unwrap();

    assert!(matches!(table.get(0), Err(ShardError::CorruptBucket { .. })));
}

// =============================================================================
// Concurrent Access Tests
// =============================================================================

#[test]
fn test_concurrent_writes_same_bucket() {
    let temp_dir = TempDir::new().unwrap();
    let table = Arc::new(Table::open(temp_dir.path(), true, 1).unwrap());

    let mut handles = vec![];
    for t in 0..8i64 {
        let table = Arc::clone(&table);
        handles.push(thread::spawn(move || {
            for i in 0..50i64 {
                let key = t * 1000 + i;
                table.set(key, key * 2).unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    for t in 0..8i64 {
        for i in 0..50i64 {
            let key = t * 1000 + i;
            assert_eq!(table.get(key).unwrap(), key * 2);
        }
    }
    assert_eq!(table.log_len(), Some(400));
    assert!(table.bucket_lock_count() <= 16);
}

#[test]
fn test_concurrent_reads_and_writes() {
    let temp_dir = TempDir::new().unwrap();
    let table = Arc::new(Table::open(temp_dir.path(), true, 1).unwrap());
    for i in 0..100i64 {
        table.set(i, 0).unwrap();
    }

    let writer = {
        let table = Arc::clone(&table);
        thread::spawn(move || {
            for round in 1..=5i64 {
                for i in 0..100i64 {
                    table.set(i, round).unwrap();
                }
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                for i in 0..100i64 {
                    // Never observes a torn bucket
                    let value = table.get(i).unwrap();
                    assert!((0..=5).contains(&value));
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    for i in 0..100i64 {
        assert_eq!(table.get(i).unwrap(), 5);
    }
    assert_eq!(table.log_len(), Some(600));
}

#[test]
fn test_table_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Table>();
}
