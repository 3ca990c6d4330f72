//! Error types for the worker pool.

use runner_sync_core::SyncError;
use std::io;

/// Errors that can occur when driving a worker pool.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// The pool has not been started, or has been shut down.
    #[error("worker pool is not running")]
    NotRunning,

    /// `start` was called on a pool that already ran.
    #[error("worker pool was already started")]
    AlreadyStarted,

    /// `start` was asked for zero workers.
    #[error("worker pool needs at least one worker")]
    InvalidWorkerCount,

    /// A non-blocking enqueue found every admission permit taken.
    #[error("worker pool is full: {capacity} items already admitted")]
    Full {
        /// Number of admission permits (the pool size).
        capacity: usize,
    },

    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn worker thread: {source}")]
    Spawn {
        /// The OS error.
        #[source]
        source: io::Error,
    },

    /// A worker thread terminated abnormally.
    #[error("worker thread {worker} panicked")]
    WorkerPanicked {
        /// Name of the worker thread.
        worker: String,
    },
}

impl PoolError {
    /// Returns `true` if a non-blocking enqueue was refused.
    pub fn is_full(&self) -> bool {
        matches!(self, PoolError::Full { .. })
    }
}

/// Result type for worker pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;

impl<E> From<PoolError> for SyncError<E> {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::Spawn { source } => SyncError::Io {
                context: "spawning worker thread".to_string(),
                source,
            },
            other => SyncError::Pool {
                reason: other.to_string(),
            },
        }
    }
}
