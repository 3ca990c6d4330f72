//! Event types for the file lock.

use runner_sync_core::SyncEvent;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Events emitted by a [`FileLock`](crate::FileLock).
#[derive(Debug, Clone)]
pub enum FileLockEvent {
    /// The lock was granted.
    Acquired {
        /// The name of the lock instance.
        instance_name: String,
        /// When the event occurred.
        timestamp: Instant,
        /// The resolved lock file path.
        path: PathBuf,
        /// How long the caller waited for the OS to grant the lock.
        waited: Duration,
    },
    /// A non-blocking request found the lock held elsewhere.
    Unavailable {
        /// The name of the lock instance.
        instance_name: String,
        /// When the event occurred.
        timestamp: Instant,
        /// The resolved lock file path.
        path: PathBuf,
    },
    /// The lock was released and its file removed.
    Released {
        /// The name of the lock instance.
        instance_name: String,
        /// When the event occurred.
        timestamp: Instant,
        /// The resolved lock file path.
        path: PathBuf,
        /// How long the lock was held.
        held: Duration,
    },
}

impl FileLockEvent {
    /// Returns the lock file path this event refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            FileLockEvent::Acquired { path, .. }
            | FileLockEvent::Unavailable { path, .. }
            | FileLockEvent::Released { path, .. } => path,
        }
    }
}

impl SyncEvent for FileLockEvent {
    fn event_type(&self) -> &'static str {
        match self {
            FileLockEvent::Acquired { .. } => "lock_acquired",
            FileLockEvent::Unavailable { .. } => "lock_unavailable",
            FileLockEvent::Released { .. } => "lock_released",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            FileLockEvent::Acquired { timestamp, .. }
            | FileLockEvent::Unavailable { timestamp, .. }
            | FileLockEvent::Released { timestamp, .. } => *timestamp,
        }
    }

    fn instance_name(&self) -> &str {
        match self {
            FileLockEvent::Acquired { instance_name, .. }
            | FileLockEvent::Unavailable { instance_name, .. }
            | FileLockEvent::Released { instance_name, .. } => instance_name,
        }
    }
}
