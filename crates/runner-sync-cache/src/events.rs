//! Event types for the cache.

use runner_sync_core::SyncEvent;
use std::time::Instant;

/// Events emitted by a [`BoundedCache`](crate::BoundedCache).
#[derive(Debug, Clone)]
pub enum CacheEvent {
    /// A lookup found a live entry.
    Hit {
        /// The name of the cache instance.
        instance_name: String,
        /// When the event occurred.
        timestamp: Instant,
        /// The key that was looked up.
        key: String,
    },
    /// A lookup found no entry.
    Miss {
        /// The name of the cache instance.
        instance_name: String,
        /// When the event occurred.
        timestamp: Instant,
        /// The key that was looked up.
        key: String,
    },
    /// A store of a new key pushed an entry out.
    Eviction {
        /// The name of the cache instance.
        instance_name: String,
        /// When the event occurred.
        timestamp: Instant,
        /// The key that was evicted.
        key: String,
    },
    /// `pop_one` removed an entry.
    Pop {
        /// The name of the cache instance.
        instance_name: String,
        /// When the event occurred.
        timestamp: Instant,
        /// The key that was removed.
        key: String,
    },
}

impl CacheEvent {
    /// Returns the key this event refers to.
    pub fn key(&self) -> &str {
        match self {
            CacheEvent::Hit { key, .. }
            | CacheEvent::Miss { key, .. }
            | CacheEvent::Eviction { key, .. }
            | CacheEvent::Pop { key, .. } => key,
        }
    }
}

impl SyncEvent for CacheEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CacheEvent::Hit { .. } => "cache_hit",
            CacheEvent::Miss { .. } => "cache_miss",
            CacheEvent::Eviction { .. } => "cache_eviction",
            CacheEvent::Pop { .. } => "cache_pop",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            CacheEvent::Hit { timestamp, .. }
            | CacheEvent::Miss { timestamp, .. }
            | CacheEvent::Eviction { timestamp, .. }
            | CacheEvent::Pop { timestamp, .. } => *timestamp,
        }
    }

    fn instance_name(&self) -> &str {
        match self {
            CacheEvent::Hit { instance_name, .. }
            | CacheEvent::Miss { instance_name, .. }
            | CacheEvent::Eviction { instance_name, .. }
            | CacheEvent::Pop { instance_name, .. } => instance_name,
        }
    }
}
