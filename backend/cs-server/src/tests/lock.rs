use crate::{LOCK_FILENAME, LockFile, ServerError};

use googletest::assert_that;
use googletest::prelude::eq;
use tempfile::TempDir;

#[test]
fn given_empty_dir_when_acquire_then_lock_records_current_pid() {
    // Given
    let dir = TempDir::new().unwrap();

    // When
    let lock = LockFile::acquire(dir.path()).unwrap();

    // Then
    assert_that!(lock.path(), eq(dir.path().join(LOCK_FILENAME).as_path()));
    let info = LockFile::read_info(lock.path()).unwrap();
    assert_that!(info.pid, eq(std::process::id()));
}

#[test]
fn given_held_lock_when_acquire_again_then_already_running() {
    // Given
    let dir = TempDir::new().unwrap();
    let _held = LockFile::acquire(dir.path()).unwrap();

    // When
    let result = LockFile::acquire(dir.path());

    // Then
    assert!(matches!(result, Err(ServerError::AlreadyRunning { .. })));
}

#[cfg(unix)]
#[test]
fn given_stale_lock_when_acquire_then_lock_is_replaced() {
    // Given
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(LOCK_FILENAME);
    // Beyond the default pid_max, so never a live process
    std::fs::write(
        &path,
        r#"{"pid": 2147483646, "started_at": "2026-01-01T00:00:00+00:00"}"#,
    )
    .unwrap();

    // When
    let lock = LockFile::acquire(dir.path()).unwrap();

    // Then
    let info = LockFile::read_info(lock.path()).unwrap();
    assert_that!(info.pid, eq(std::process::id()));
}

#[test]
fn given_unreadable_lock_contents_when_acquire_then_lock_is_taken() {
    // Given
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(LOCK_FILENAME), "not json").unwrap();

    // When
    let lock = LockFile::acquire(dir.path());

    // Then
    assert!(lock.is_ok());
}

#[test]
fn given_acquired_lock_when_dropped_then_file_is_removed() {
    // Given
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(LOCK_FILENAME);
    let lock = LockFile::acquire(dir.path()).unwrap();
    assert!(path.exists());

    // When
    drop(lock);

    // Then
    assert!(!path.exists());
}

#[test]
fn given_released_lock_when_acquire_again_then_succeeds() {
    let dir = TempDir::new().unwrap();
    let mut first = LockFile::acquire(dir.path()).unwrap();

    first.release();

    assert!(LockFile::acquire(dir.path()).is_ok());
}
