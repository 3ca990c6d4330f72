//! Mutual exclusion tests for the advisory file lock.

use runner_sync_filelock::{FileLock, FileLockError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[test]
fn second_holder_is_refused_until_release() {
    let dir = tempfile::tempdir().unwrap();
    let first = FileLock::builder().base_dir(dir.path()).name("first").build();
    let second = FileLock::builder().base_dir(dir.path()).name("second").build();

    let guard = first.acquire("suite.lock").unwrap();
    match second.try_acquire("suite.lock") {
        Err(FileLockError::LockUnavailable { path }) => {
            assert_eq!(path, dir.path().join("suite.lock"));
        }
        other => panic!("expected LockUnavailable, got {:?}", other),
    }

    guard.release().unwrap();
    second.try_acquire("suite.lock").unwrap().release().unwrap();
}

#[test]
fn concurrent_try_acquire_grants_exactly_one() {
    let dir = tempfile::tempdir().unwrap();
    let lock = FileLock::builder().base_dir(dir.path()).build();
    let barrier = Arc::new(Barrier::new(8));
    let winners = Arc::new(AtomicUsize::new(0));
    let hold = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let lock = lock.clone();
            let barrier = Arc::clone(&barrier);
            let winners = Arc::clone(&winners);
            let hold = Arc::clone(&hold);
            thread::spawn(move || {
                barrier.wait();
                let result = lock.try_acquire("race.lock");
                if result.is_ok() {
                    winners.fetch_add(1, Ordering::SeqCst);
                }
                // Keep the winner's guard alive until everyone has tried
                hold.wait();
                match result {
                    Ok(guard) => guard.release().unwrap(),
                    Err(err) => assert!(err.is_unavailable()),
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(winners.load(Ordering::SeqCst), 1);
}

#[test]
fn blocking_acquire_waits_for_release() {
    let dir = tempfile::tempdir().unwrap();
    let lock = FileLock::builder().base_dir(dir.path()).build();
    let released = Arc::new(AtomicBool::new(false));

    let guard = lock.acquire("serial.lock").unwrap();

    let waiter = {
        let lock = lock.clone();
        let released = Arc::clone(&released);
        thread::spawn(move || {
            let guard = lock.acquire("serial.lock").unwrap();
            assert!(released.load(Ordering::SeqCst), "acquired while held");
            guard.release().unwrap();
        })
    };

    thread::sleep(Duration::from_millis(100));
    assert!(!waiter.is_finished());

    released.store(true, Ordering::SeqCst);
    guard.release().unwrap();
    waiter.join().unwrap();
}

#[test]
fn critical_sections_do_not_overlap() {
    let dir = tempfile::tempdir().unwrap();
    let lock = FileLock::builder().base_dir(dir.path()).build();
    let inside = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let lock = lock.clone();
            let inside = Arc::clone(&inside);
            let peak = Arc::clone(&peak);
            thread::spawn(move || {
                for _ in 0..10 {
                    // Release removes the file, so retry on a lost race
                    let guard = loop {
                        match lock.try_acquire("section.lock") {
                            Ok(guard) => break guard,
                            Err(err) if err.is_unavailable() => {
                                thread::sleep(Duration::from_millis(1))
                            }
                            Err(err) => panic!("{}", err),
                        }
                    };
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(1));
                    inside.fetch_sub(1, Ordering::SeqCst);
                    guard.release().unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(peak.load(Ordering::SeqCst), 1);
}

#[test]
fn blocking_churn_keeps_one_holder() {
    let dir = tempfile::tempdir().unwrap();
    let lock = FileLock::builder().base_dir(dir.path()).build();
    let inside = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let lock = lock.clone();
            let inside = Arc::clone(&inside);
            let peak = Arc::clone(&peak);
            thread::spawn(move || {
                for _ in 0..200 {
                    let guard = lock.acquire("churn.lock").unwrap();
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    thread::yield_now();
                    inside.fetch_sub(1, Ordering::SeqCst);
                    guard.release().unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(peak.load(Ordering::SeqCst), 1);
    assert!(!dir.path().join("churn.lock").exists());
}
