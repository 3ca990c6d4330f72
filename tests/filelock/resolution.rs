//! Path resolution and cleanup tests for the advisory file lock.

use runner_sync_filelock::{FileLock, LockBackend, LockMode, DEFAULT_LOCK_DIR};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn relative_names_resolve_under_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    let lock = FileLock::builder().base_dir(dir.path()).build();

    assert_eq!(
        lock.resolve("nested/run.lock").unwrap(),
        dir.path().join("nested").join("run.lock")
    );

    let guard = lock.try_acquire("nested/run.lock").unwrap();
    assert!(dir.path().join("nested").is_dir());
    guard.release().unwrap();
}

#[test]
fn default_base_is_runner_dir_in_home() {
    let lock = FileLock::new();
    if let Ok(path) = lock.resolve("x.lock") {
        let parent = path.parent().unwrap();
        assert!(parent.ends_with(DEFAULT_LOCK_DIR));
    }
}

#[test]
fn absolute_paths_ignore_base_dir() {
    let base = tempfile::tempdir().unwrap();
    let elsewhere = tempfile::tempdir().unwrap();
    let lock = FileLock::builder().base_dir(base.path()).build();

    let target = elsewhere.path().join("abs.lock");
    let guard = lock.try_acquire(&target).unwrap();
    assert_eq!(guard.path(), target.as_path());
    guard.release().unwrap();
}

#[test]
fn release_deletes_lock_file() {
    let dir = tempfile::tempdir().unwrap();
    let lock = FileLock::builder().base_dir(dir.path()).build();

    let guard = lock.acquire("cleanup.lock").unwrap();
    assert!(dir.path().join("cleanup.lock").exists());
    guard.release().unwrap();
    assert!(!dir.path().join("cleanup.lock").exists());
}

#[test]
fn release_tolerates_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let lock = FileLock::builder().base_dir(dir.path()).build();

    let guard = lock.acquire("vanished.lock").unwrap();
    std::fs::remove_file(guard.path()).unwrap();
    guard.release().unwrap();
}

#[test]
fn explicit_mode_matches_shorthands() {
    let dir = tempfile::tempdir().unwrap();
    let lock = FileLock::builder()
        .base_dir(dir.path())
        .backend(LockBackend::detect())
        .build();

    let guard = lock.lock("mode.lock", LockMode::Blocking).unwrap();
    assert!(lock
        .lock("mode.lock", LockMode::NonBlocking)
        .unwrap_err()
        .is_unavailable());
    guard.release().unwrap();
}

#[test]
fn listeners_see_full_lifecycle() {
    let events = Arc::new(AtomicUsize::new(0));
    let (a, u, r) = (Arc::clone(&events), Arc::clone(&events), Arc::clone(&events));

    let dir = tempfile::tempdir().unwrap();
    let lock = FileLock::builder()
        .base_dir(dir.path())
        .on_acquired(move |path, _| {
            assert!(path.ends_with("events.lock"));
            a.fetch_add(1, Ordering::SeqCst);
        })
        .on_unavailable(move |_| {
            u.fetch_add(10, Ordering::SeqCst);
        })
        .on_released(move |_, _| {
            r.fetch_add(100, Ordering::SeqCst);
        })
        .build();

    let guard = lock.try_acquire("events.lock").unwrap();
    let _ = lock.try_acquire("events.lock");
    drop(guard);

    assert_eq!(events.load(Ordering::SeqCst), 111);
}
