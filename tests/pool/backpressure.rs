//! Admission backpressure tests for the worker pool.

use runner_sync_pool::{PoolError, WorkerPool};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Handler gate: every item blocks until the test releases it.
struct Gate {
    release: Mutex<mpsc::Receiver<()>>,
    entered: AtomicUsize,
}

impl Gate {
    fn new() -> (Arc<Self>, mpsc::Sender<()>) {
        let (tx, rx) = mpsc::channel();
        let gate = Arc::new(Self {
            release: Mutex::new(rx),
            entered: AtomicUsize::new(0),
        });
        (gate, tx)
    }

    fn pass(&self) {
        self.entered.fetch_add(1, Ordering::SeqCst);
        let _ = self.release.lock().unwrap().recv();
    }

    fn wait_for_entered(&self, n: usize) {
        for _ in 0..500 {
            if self.entered.load(Ordering::SeqCst) >= n {
                return;
            }
            thread::sleep(Duration::from_millis(2));
        }
        panic!("handlers never reached {}", n);
    }
}

#[test]
fn producer_blocks_when_all_permits_held() {
    let (gate, release) = Gate::new();
    let handler_gate = Arc::clone(&gate);

    let pool = Arc::new(WorkerPool::new());
    pool.start(2, move |_: u32| {
        handler_gate.pass();
        Ok::<(), String>(())
    })
    .unwrap();

    pool.enqueue(1).unwrap();
    pool.enqueue(2).unwrap();
    gate.wait_for_entered(2);

    let producer = {
        let pool = Arc::clone(&pool);
        thread::spawn(move || pool.enqueue(3))
    };

    thread::sleep(Duration::from_millis(100));
    assert!(!producer.is_finished(), "third enqueue should be blocked");
    assert_eq!(pool.stats().submitted, 2);

    release.send(()).unwrap();
    producer.join().unwrap().unwrap();
    assert_eq!(pool.stats().submitted, 3);

    release.send(()).unwrap();
    release.send(()).unwrap();
    pool.shutdown().unwrap();
    assert_eq!(pool.stats().completed, 3);
}

#[test]
fn five_items_on_two_workers_take_three_rounds() {
    let nap = Duration::from_millis(60);

    let pool = WorkerPool::new();
    pool.start(2, move |_: u32| {
        thread::sleep(nap);
        Ok::<(), String>(())
    })
    .unwrap();

    let start = Instant::now();
    for i in 0..5 {
        pool.enqueue(i).unwrap();
    }
    pool.shutdown().unwrap();
    let elapsed = start.elapsed();

    // ceil(5 / 2) handler rounds run back to back
    assert!(elapsed >= nap * 3, "finished in {:?}", elapsed);
    assert_eq!(pool.stats().completed, 5);
}

#[test]
fn try_enqueue_reports_full_capacity() {
    let (gate, release) = Gate::new();
    let handler_gate = Arc::clone(&gate);

    let pool = WorkerPool::new();
    pool.start(3, move |_: u32| {
        handler_gate.pass();
        Ok::<(), String>(())
    })
    .unwrap();

    for i in 0..3 {
        pool.try_enqueue(i).unwrap();
    }

    match pool.try_enqueue(99) {
        Err(PoolError::Full { capacity }) => assert_eq!(capacity, 3),
        other => panic!("expected Full, got {:?}", other),
    }

    for _ in 0..3 {
        release.send(()).unwrap();
    }
    pool.shutdown().unwrap();
    assert_eq!(pool.stats().submitted, 3);
}

#[test]
fn concurrency_never_exceeds_worker_count() {
    let current = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let (c, p) = (Arc::clone(&current), Arc::clone(&peak));

    let pool = Arc::new(WorkerPool::new());
    pool.start(4, move |_: u32| {
        let now = c.fetch_add(1, Ordering::SeqCst) + 1;
        p.fetch_max(now, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(1));
        c.fetch_sub(1, Ordering::SeqCst);
        Ok::<(), String>(())
    })
    .unwrap();

    let producers: Vec<_> = (0..4)
        .map(|t| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                for i in 0..50 {
                    pool.enqueue(t * 100 + i).unwrap();
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    pool.shutdown().unwrap();
    assert!(peak.load(Ordering::SeqCst) <= 4);
    assert_eq!(pool.stats().completed, 200);
}

#[test]
fn single_producer_items_leave_queue_in_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&order);

    let pool = WorkerPool::new();
    pool.start(1, move |i: u32| {
        sink.lock().unwrap().push(i);
        Ok::<(), String>(())
    })
    .unwrap();

    for i in 0..100 {
        pool.enqueue(i).unwrap();
    }
    pool.shutdown().unwrap();

    assert_eq!(*order.lock().unwrap(), (0..100).collect::<Vec<_>>());
}
