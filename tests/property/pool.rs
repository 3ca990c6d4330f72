//! Property tests for the worker pool.
//!
//! Invariants tested:
//! - Every enqueued item is handled exactly once before shutdown returns
//! - completed + failed == submitted after shutdown
//! - Handler concurrency never exceeds the worker count

use proptest::prelude::*;
use runner_sync_pool::{PoolState, WorkerPool};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Property: shutdown returns only after every item was handled once
    #[test]
    fn every_item_handled_once(
        workers in 1usize..8,
        items in prop::collection::vec(any::<u32>(), 0..200),
    ) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let pool = WorkerPool::new();
        pool.start(workers, move |item: u32| {
            sink.lock().unwrap().push(item);
            Ok::<(), String>(())
        }).unwrap();

        for item in &items {
            pool.enqueue(*item).unwrap();
        }
        pool.shutdown().unwrap();

        let mut seen = seen.lock().unwrap().clone();
        let mut expected = items.clone();
        seen.sort();
        expected.sort();
        prop_assert_eq!(seen, expected);
        prop_assert_eq!(pool.state(), PoolState::Stopped);
    }

    /// Property: failures and successes add up to submissions
    #[test]
    fn stats_add_up(
        workers in 1usize..6,
        items in prop::collection::vec(any::<bool>(), 0..100),
    ) {
        let pool = WorkerPool::new();
        pool.start(workers, |ok: bool| {
            if ok { Ok(()) } else { Err("rejected") }
        }).unwrap();

        for ok in &items {
            pool.enqueue(*ok).unwrap();
        }
        pool.shutdown().unwrap();

        let stats = pool.stats();
        let failures = items.iter().filter(|ok| !**ok).count() as u64;
        prop_assert_eq!(stats.submitted, items.len() as u64);
        prop_assert_eq!(stats.failed, failures);
        prop_assert_eq!(stats.completed + stats.failed, stats.submitted);
    }

    /// Property: at most `workers` handlers run at the same time
    #[test]
    fn concurrency_bounded_by_workers(
        workers in 1usize..6,
        count in 1usize..60,
    ) {
        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (cur, pk) = (Arc::clone(&current), Arc::clone(&peak));

        let pool = WorkerPool::new();
        pool.start(workers, move |_: usize| {
            let now = cur.fetch_add(1, Ordering::SeqCst) + 1;
            pk.fetch_max(now, Ordering::SeqCst);
            std::thread::yield_now();
            cur.fetch_sub(1, Ordering::SeqCst);
            Ok::<(), String>(())
        }).unwrap();

        for i in 0..count {
            pool.enqueue(i).unwrap();
        }
        pool.shutdown().unwrap();

        prop_assert!(peak.load(Ordering::SeqCst) <= workers);
        prop_assert_eq!(current.load(Ordering::SeqCst), 0);
    }
}
