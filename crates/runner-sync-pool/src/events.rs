//! Event types for the worker pool.

use runner_sync_core::SyncEvent;
use std::time::{Duration, Instant};

/// Events emitted by a [`WorkerPool`](crate::WorkerPool).
#[derive(Debug, Clone)]
pub enum PoolEvent {
    /// A worker picked up an item.
    TaskStarted {
        /// The name of the pool.
        instance_name: String,
        /// When the event occurred.
        timestamp: Instant,
        /// Index of the worker thread.
        worker: usize,
    },
    /// The handler returned `Ok`.
    TaskCompleted {
        /// The name of the pool.
        instance_name: String,
        /// When the event occurred.
        timestamp: Instant,
        /// Index of the worker thread.
        worker: usize,
        /// Time spent in the handler.
        duration: Duration,
    },
    /// The handler returned `Err` or panicked.
    TaskFailed {
        /// The name of the pool.
        instance_name: String,
        /// When the event occurred.
        timestamp: Instant,
        /// Index of the worker thread.
        worker: usize,
        /// Time spent in the handler.
        duration: Duration,
        /// The handler error or panic message.
        error: String,
    },
    /// Every worker was joined.
    Shutdown {
        /// The name of the pool.
        instance_name: String,
        /// When the event occurred.
        timestamp: Instant,
        /// Number of workers joined.
        workers: usize,
        /// Time spent draining the queue and joining.
        duration: Duration,
    },
}

impl SyncEvent for PoolEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PoolEvent::TaskStarted { .. } => "task_started",
            PoolEvent::TaskCompleted { .. } => "task_completed",
            PoolEvent::TaskFailed { .. } => "task_failed",
            PoolEvent::Shutdown { .. } => "pool_shutdown",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            PoolEvent::TaskStarted { timestamp, .. }
            | PoolEvent::TaskCompleted { timestamp, .. }
            | PoolEvent::TaskFailed { timestamp, .. }
            | PoolEvent::Shutdown { timestamp, .. } => *timestamp,
        }
    }

    fn instance_name(&self) -> &str {
        match self {
            PoolEvent::TaskStarted { instance_name, .. }
            | PoolEvent::TaskCompleted { instance_name, .. }
            | PoolEvent::TaskFailed { instance_name, .. }
            | PoolEvent::Shutdown { instance_name, .. } => instance_name,
        }
    }
}
