//! Observability guide for runner-sync.
//!
//! Every primitive reports through three channels: event listeners (always
//! available), `tracing` spans and events, and `metrics` counters and gauges.

/// Metrics documentation
pub mod metrics {
    //! # Metrics Guide
    //!
    //! Enable the `metrics` feature and install any `metrics` recorder.
    //!
    //! ```toml
    //! [dependencies]
    //! runner-sync = { version = "0.3", features = ["full", "metrics"] }
    //! metrics = "0.24"
    //! ```
    //!
    //! ## Instance Naming
    //!
    //! Every metric carries the instance name as a label (`cache`, `pool` or
    //! `lock`), so name your instances:
    //!
    //! ```rust,ignore
    //! let ids = BoundedCache::builder().name("test-ids").build();
    //! let pool = WorkerPool::builder().name("upload").build();
    //! ```
    //!
    //! ## Cache
    //!
    //! | Metric | Type | Labels |
    //! |--------|------|--------|
    //! | `cache_requests_total` | counter | `cache`, `result` = `hit` / `miss` |
    //! | `cache_evictions_total` | counter | `cache` |
    //! | `cache_size` | gauge | `cache` |
    //!
    //! ## Worker Pool
    //!
    //! | Metric | Type | Labels |
    //! |--------|------|--------|
    //! | `pool_tasks_submitted_total` | counter | `pool` |
    //! | `pool_tasks_completed_total` | counter | `pool` |
    //! | `pool_tasks_failed_total` | counter | `pool` |
    //! | `pool_tasks_in_flight` | gauge | `pool` |
    //!
    //! ## File Lock
    //!
    //! | Metric | Type | Labels |
    //! |--------|------|--------|
    //! | `filelock_acquisitions_total` | counter | `lock`, `result` = `acquired` / `unavailable` |
    //! | `filelock_releases_total` | counter | `lock` |
}

/// Tracing documentation
pub mod tracing {
    //! # Tracing Guide
    //!
    //! With the `tracing` feature each primitive logs with structured fields
    //! named after the instance (`cache = %name`, `pool = %name`,
    //! `lock = %name`). The pool crate enables `tracing` by default so handler
    //! failures are always reported at `WARN`.
    //!
    //! ```rust,ignore
    //! tracing_subscriber::fmt()
    //!     .with_env_filter("runner_sync_pool=warn,runner_sync_cache=debug")
    //!     .init();
    //! ```
    //!
    //! | Level | Events |
    //! |-------|--------|
    //! | `DEBUG` | cache hit / miss / eviction / pop, lock acquired / released |
    //! | `INFO` | pool started, pool shut down |
    //! | `WARN` | task handler failed, panicking event listener, release on drop failed |
}

/// Event listener documentation
pub mod events {
    //! # Event Listeners
    //!
    //! Builders expose `on_*` callbacks backed by
    //! [`EventListeners`](crate::core::EventListeners). A panicking listener is
    //! isolated; the remaining listeners still run.
    //!
    //! Cache listeners run after the cache lock is released, so a listener
    //! may call back into the cache.
}
