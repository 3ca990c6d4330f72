//! Configuration for the cache.

use crate::eviction::EvictionPolicy;
use crate::events::CacheEvent;
use runner_sync_core::{EventListeners, FnListener};
use std::marker::PhantomData;

/// Configuration for a [`BoundedCache`](crate::BoundedCache).
pub struct CacheConfig {
    pub(crate) capacity: usize,
    pub(crate) eviction_policy: EvictionPolicy,
    pub(crate) seed: Option<u64>,
    pub(crate) event_listeners: EventListeners<CacheEvent>,
    pub(crate) name: String,
}

impl CacheConfig {
    /// Creates a new configuration builder.
    pub fn builder<V>() -> CacheConfigBuilder<V> {
        CacheConfigBuilder::new()
    }
}

/// Builder for configuring and constructing a cache holding values of type `V`.
pub struct CacheConfigBuilder<V> {
    capacity: usize,
    eviction_policy: EvictionPolicy,
    seed: Option<u64>,
    event_listeners: EventListeners<CacheEvent>,
    name: String,
    _value: PhantomData<fn() -> V>,
}

impl<V> CacheConfigBuilder<V> {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self {
            capacity: 100,
            eviction_policy: EvictionPolicy::default(),
            seed: None,
            event_listeners: EventListeners::new(),
            name: String::from("<unnamed>"),
            _value: PhantomData,
        }
    }

    /// Sets the maximum number of entries in the cache.
    ///
    /// A capacity of 0 is treated as 1.
    ///
    /// Default: 100
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the eviction policy.
    ///
    /// Default: [`EvictionPolicy::Fifo`]
    pub fn eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction_policy = policy;
        self
    }

    /// Seeds the random source used by `pop_one`.
    ///
    /// Default: None (seeded from the OS)
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the name of this cache instance for observability.
    ///
    /// Default: `"<unnamed>"`
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback to be invoked when a lookup hits.
    pub fn on_hit<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let CacheEvent::Hit { key, .. } = event {
                f(key);
            }
        }));
        self
    }

    /// Registers a callback to be invoked when a lookup misses.
    pub fn on_miss<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let CacheEvent::Miss { key, .. } = event {
                f(key);
            }
        }));
        self
    }

    /// Registers a callback to be invoked when an entry is evicted.
    pub fn on_eviction<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let CacheEvent::Eviction { key, .. } = event {
                f(key);
            }
        }));
        self
    }

    /// Registers a callback to be invoked when `pop_one` removes an entry.
    pub fn on_pop<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let CacheEvent::Pop { key, .. } = event {
                f(key);
            }
        }));
        self
    }

    /// Builds the cache.
    pub fn build(self) -> crate::BoundedCache<V>
    where
        V: Send + 'static,
    {
        let config = CacheConfig {
            capacity: self.capacity.max(1),
            eviction_policy: self.eviction_policy,
            seed: self.seed,
            event_listeners: self.event_listeners,
            name: self.name,
        };
        crate::BoundedCache::with_config(config)
    }
}

impl<V> Default for CacheConfigBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}
