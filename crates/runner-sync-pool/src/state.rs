//! Worker pool lifecycle.

use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};

/// Lifecycle of a [`WorkerPool`](crate::WorkerPool).
///
/// A pool moves forward only: `Unstarted -> Running -> Draining -> Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PoolState {
    /// Created, no workers yet.
    Unstarted = 0,
    /// Workers are consuming the queue and new items are admitted.
    Running = 1,
    /// Shutdown is in progress; new items are rejected.
    Draining = 2,
    /// Every worker has been joined.
    Stopped = 3,
}

impl PoolState {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => PoolState::Unstarted,
            1 => PoolState::Running,
            2 => PoolState::Draining,
            _ => PoolState::Stopped,
        }
    }

    /// Returns `true` if the pool currently admits items.
    pub fn is_running(self) -> bool {
        self == PoolState::Running
    }
}

/// Point-in-time task counters for a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Items admitted into the queue.
    pub submitted: u64,
    /// Items whose handler returned `Ok`.
    pub completed: u64,
    /// Items whose handler returned `Err` or panicked.
    pub failed: u64,
}

/// Counters shared between the pool handle and its workers.
#[derive(Debug, Default)]
pub(crate) struct Shared {
    state: AtomicU8,
    submitted: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    in_flight: AtomicUsize,
}

impl Shared {
    pub(crate) fn state(&self) -> PoolState {
        PoolState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn set_state(&self, state: PoolState) {
        self.state.store(state as u8, Ordering::Release);
    }

    pub(crate) fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Marks a task as started and returns the new in-flight count.
    pub(crate) fn task_started(&self) -> usize {
        self.in_flight.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Marks a task as finished and returns the new in-flight count.
    pub(crate) fn task_finished(&self, ok: bool) -> usize {
        if ok {
            self.completed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        self.in_flight.fetch_sub(1, Ordering::AcqRel) - 1
    }

    pub(crate) fn stats(&self) -> PoolStats {
        PoolStats {
            submitted: self.submitted.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}
