//! Fixed-size worker pool for repetitive I/O-bound tasks.
//!
//! A [`WorkerPool`] runs `n` OS threads that apply one handler to every queued
//! item. Admission is bounded: each queued item holds one of `n` permits from
//! the moment it is enqueued until a worker finishes with it, so producers
//! block once `n` items are outstanding.
//!
//! Shutdown is deterministic. [`WorkerPool::shutdown`] queues one sentinel per
//! worker behind the pending items, waits until every permit has come back,
//! and joins the threads. When it returns, no handler is running.
//!
//! # Basic Example
//!
//! ```rust
//! use runner_sync_pool::WorkerPool;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let sent = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&sent);
//!
//! let pool = WorkerPool::new();
//! pool.start(4, move |request_id: u32| {
//!     // call the API under test...
//!     let _ = request_id;
//!     counter.fetch_add(1, Ordering::SeqCst);
//!     Ok::<(), std::io::Error>(())
//! })
//! .unwrap();
//!
//! for id in 0..100 {
//!     pool.enqueue(id).unwrap();
//! }
//! pool.shutdown().unwrap();
//!
//! assert_eq!(sent.load(Ordering::SeqCst), 100);
//! ```
//!
//! # Handler Failures
//!
//! A handler returning `Err`, or panicking, does not take its worker down.
//! The failure is logged (with the default `tracing` feature), counted in
//! [`WorkerPool::stats`], and reported to `on_task_failed` listeners:
//!
//! ```rust
//! use runner_sync_pool::WorkerPool;
//!
//! let pool = WorkerPool::builder()
//!     .name("uploads")
//!     .on_task_failed(|error| eprintln!("upload failed: {}", error))
//!     .build();
//!
//! pool.start(2, |size: usize| {
//!     if size > 10 {
//!         Err(format!("payload of {} bytes rejected", size))
//!     } else {
//!         Ok(())
//!     }
//! })
//! .unwrap();
//!
//! pool.enqueue(5).unwrap();
//! pool.enqueue(50).unwrap();
//! pool.shutdown().unwrap();
//!
//! assert_eq!(pool.stats().failed, 1);
//! ```
//!
//! # Non-blocking Admission
//!
//! [`WorkerPool::try_enqueue`] returns [`PoolError::Full`] instead of waiting.

mod config;
mod error;
mod events;
mod pool;
mod state;

pub use config::{WorkerPoolConfig, WorkerPoolConfigBuilder};
pub use error::{PoolError, Result};
pub use events::PoolEvent;
pub use pool::{WorkerPool, DEFAULT_WORKERS};
pub use state::{PoolState, PoolStats};
