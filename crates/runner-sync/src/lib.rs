//! Concurrency and shared-state primitives for REST API test runners.
//!
//! `runner-sync` bundles three small primitives that a test harness reaches
//! for once it starts running suites in parallel. Each one is available as an
//! individual crate and as a feature in this meta-crate.
//!
//! # Primitives
//!
//! - **Worker pool** (`pool` feature): fixed-size OS threads applying one
//!   handler to queued items, with bounded admission and graceful shutdown
//! - **Bounded cache** (`cache` feature): fixed-capacity string-keyed map with
//!   oldest-first eviction and random `pop_one`
//! - **File lock** (`filelock` feature): cross-process advisory lock on a
//!   named path, `flock` on unix and `LockFileEx` on Windows
//!
//! # Usage
//!
//! ```toml
//! [dependencies]
//! runner-sync = { version = "0.3", features = ["pool", "cache"] }
//! ```
//!
//! Or enable every primitive:
//!
//! ```toml
//! [dependencies]
//! runner-sync = { version = "0.3", features = ["full"] }
//! ```
//!
//! # Example
//!
//! A load generator that creates orders through a pool of workers and keeps
//! the created ids in a cache for later steps to pick from:
//!
//! ```rust
//! # #[cfg(all(feature = "cache", feature = "pool"))]
//! # {
//! use runner_sync::cache::{BoundedCache, EvictionPolicy};
//! use runner_sync::pool::WorkerPool;
//!
//! let created = BoundedCache::new(1_000, EvictionPolicy::RandomPop);
//! let sink = created.clone();
//!
//! let pool = WorkerPool::builder().name("create-order").build();
//! pool.start(8, move |n: u32| {
//!     // POST /orders ...
//!     sink.store(format!("order-{}", n), n);
//!     Ok::<(), std::io::Error>(())
//! })
//! .unwrap();
//!
//! for n in 0..64 {
//!     pool.enqueue(n).unwrap();
//! }
//! pool.shutdown().unwrap();
//!
//! let (id, _) = created.pop_one().unwrap();
//! assert!(id.starts_with("order-"));
//! # }
//! ```
//!
//! # Unified Errors
//!
//! Every primitive error converts into [`core::SyncError`], so code that uses
//! several primitives can propagate them with `?` through one type.
//!
//! # Individual Crates
//!
//! - `runner-sync-pool`
//! - `runner-sync-cache`
//! - `runner-sync-filelock`
//! - `runner-sync-core` (shared infrastructure)

// Re-export core (always available)
pub use runner_sync_core as core;

// Re-export primitives based on features
#[cfg(feature = "cache")]
pub use runner_sync_cache as cache;

#[cfg(feature = "filelock")]
pub use runner_sync_filelock as filelock;

#[cfg(feature = "pool")]
pub use runner_sync_pool as pool;

pub mod observability;
