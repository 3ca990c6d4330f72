//! Cache stress tests

use runner_sync_cache::{BoundedCache, EvictionPolicy};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

/// Test: Large cache (100k entries)
#[test]
#[ignore]
fn stress_large_cache() {
    let cache = BoundedCache::new(100_000, EvictionPolicy::Fifo);

    let start = Instant::now();
    for i in 0..100_000u32 {
        assert!(cache.store(format!("key-{}", i), i).is_none());
    }
    let fill_time = start.elapsed();

    let hit_start = Instant::now();
    for i in 0..100_000u32 {
        assert_eq!(cache.lookup(&format!("key-{}", i)).unwrap(), i);
    }
    let hit_time = hit_start.elapsed();

    println!("Filled 100k entries in {:?}, looked up in {:?}", fill_time, hit_time);
    assert_eq!(cache.len(), 100_000);
}

/// Test: Constant FIFO churn with deletes keeps the order queue bounded
#[test]
#[ignore]
fn stress_fifo_churn() {
    let cache = BoundedCache::new(1_000, EvictionPolicy::Fifo);
    let mut evictions = 0usize;

    for i in 0..500_000u32 {
        if cache.store(format!("k{}", i), i).is_some() {
            evictions += 1;
        }
        if i % 3 == 0 {
            cache.delete(&format!("k{}", i / 2));
        }
        assert!(cache.len() <= 1_000);
    }

    println!("FIFO churn: {} evictions", evictions);
    assert!(evictions > 0);
}

/// Test: Many threads storing and popping on one shared cache
#[test]
#[ignore]
fn stress_concurrent_store_and_pop() {
    let cache = BoundedCache::new(256, EvictionPolicy::RandomPop);
    let stored = Arc::new(AtomicUsize::new(0));
    let removed = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for t in 0..16u32 {
        let cache = cache.clone();
        let stored = Arc::clone(&stored);
        let removed = Arc::clone(&removed);
        handles.push(thread::spawn(move || {
            for i in 0..20_000u32 {
                let id = t * 1_000_000 + i;
                stored.fetch_add(1, Ordering::Relaxed);
                if cache.store(id.to_string(), id).is_some() {
                    removed.fetch_add(1, Ordering::Relaxed);
                }
                if i % 4 == 0 && cache.pop_one().is_some() {
                    removed.fetch_add(1, Ordering::Relaxed);
                }
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let remaining = cache.len();
    println!(
        "stored {}, removed {}, remaining {}",
        stored.load(Ordering::Relaxed),
        removed.load(Ordering::Relaxed),
        remaining
    );
    assert!(remaining <= 256);
    assert_eq!(
        stored.load(Ordering::Relaxed),
        removed.load(Ordering::Relaxed) + remaining
    );

    let mut drained = HashSet::new();
    while let Some((key, _)) = cache.pop_one() {
        assert!(drained.insert(key));
    }
    assert_eq!(drained.len(), remaining);
}
