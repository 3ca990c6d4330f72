//! Thread-safe fixed-capacity cache.
//!
//! [`BoundedCache`] maps string keys to values and never holds more than its
//! capacity. When a new key arrives at a full cache, the oldest live entry is
//! evicted; reads never refresh it. The [`EvictionPolicy`] picks the layout:
//!
//! - **Fifo** keeps a plain table.
//! - **RandomPop** keeps a dense table so [`BoundedCache::pop_one`] is cheap.
//!
//! `pop_one` removes and returns a uniformly random entry under either
//! policy. That suits tracking in-flight entities (created orders, open
//! sessions) that a load generator later picks off one at a time.
//!
//! # Basic Example
//!
//! ```rust
//! use runner_sync_cache::{BoundedCache, EvictionPolicy};
//!
//! let cache = BoundedCache::new(2, EvictionPolicy::Fifo);
//! cache.store("a", 1);
//! cache.store("b", 2);
//! cache.store("c", 3); // evicts "a"
//!
//! assert!(cache.lookup("a").is_err());
//! assert_eq!(cache.lookup("c").unwrap(), 3);
//! ```
//!
//! # Sharing
//!
//! Cloning a cache yields another handle to the same entries:
//!
//! ```rust
//! use runner_sync_cache::BoundedCache;
//!
//! let cache = BoundedCache::builder()
//!     .capacity(64)
//!     .name("test-ids")
//!     .build();
//!
//! let writer = cache.clone();
//! std::thread::spawn(move || writer.store("login", String::from("id-1")))
//!     .join()
//!     .unwrap();
//!
//! assert_eq!(cache.lookup("login").unwrap(), "id-1");
//! ```
//!
//! # Observability
//!
//! ```rust
//! use runner_sync_cache::{BoundedCache, EvictionPolicy};
//!
//! let cache: BoundedCache<u64> = BoundedCache::builder()
//!     .capacity(10)
//!     .eviction_policy(EvictionPolicy::RandomPop)
//!     .on_eviction(|key| println!("evicted {}", key))
//!     .on_pop(|key| println!("picked {}", key))
//!     .build();
//! # let _ = cache;
//! ```

mod config;
mod error;
mod eviction;
mod events;
mod store;

pub use config::{CacheConfig, CacheConfigBuilder};
pub use error::CacheError;
pub use eviction::EvictionPolicy;
pub use events::CacheEvent;

use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use store::CacheStore;

#[cfg(feature = "metrics")]
use metrics::{counter, describe_counter, describe_gauge, gauge};

#[cfg(feature = "tracing")]
use tracing::debug;

/// A fixed-capacity, thread-safe map from string keys to values.
///
/// Every operation runs under one per-instance lock; listeners are called
/// after it is released.
pub struct BoundedCache<V> {
    config: Arc<CacheConfig>,
    store: Arc<Mutex<CacheStore<V>>>,
}

impl<V: Send + 'static> BoundedCache<V> {
    /// Creates a cache with the given capacity and eviction policy.
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Self {
        CacheConfig::builder()
            .capacity(capacity)
            .eviction_policy(policy)
            .build()
    }

    /// Creates a new configuration builder.
    pub fn builder() -> CacheConfigBuilder<V> {
        CacheConfigBuilder::new()
    }

    pub(crate) fn with_config(config: CacheConfig) -> Self {
        #[cfg(feature = "metrics")]
        {
            describe_counter!(
                "cache_requests_total",
                "Total number of cache lookups (hits and misses)"
            );
            describe_counter!("cache_evictions_total", "Total number of cache evictions");
            describe_gauge!("cache_size", "Current number of entries in the cache");
        }

        let store = CacheStore::new(config.capacity, config.eviction_policy, config.seed);
        Self {
            config: Arc::new(config),
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Inserts or overwrites `key`.
    ///
    /// Overwriting keeps the key's place in eviction order. Storing a new key
    /// into a full cache evicts exactly one entry, which is returned.
    pub fn store(&self, key: impl Into<String>, value: V) -> Option<(String, V)> {
        let key = key.into();
        let (evicted, _size) = {
            let mut store = self.store.lock();
            let evicted = store.insert(key, value);
            (evicted, store.len())
        };

        #[cfg(feature = "metrics")]
        gauge!("cache_size", "cache" => self.config.name.clone()).set(_size as f64);

        if let Some((victim, _)) = &evicted {
            #[cfg(feature = "metrics")]
            counter!("cache_evictions_total", "cache" => self.config.name.clone()).increment(1);

            #[cfg(feature = "tracing")]
            debug!(cache = %self.config.name, key = %victim, "cache eviction");

            self.emit(|instance_name, timestamp| CacheEvent::Eviction {
                instance_name,
                timestamp,
                key: victim.clone(),
            });
        }

        evicted
    }

    /// Removes `key`, returning its value. Removing an absent key is a no-op.
    pub fn delete(&self, key: &str) -> Option<V> {
        let (removed, _size) = {
            let mut store = self.store.lock();
            let removed = store.remove(key);
            (removed, store.len())
        };

        #[cfg(feature = "metrics")]
        gauge!("cache_size", "cache" => self.config.name.clone()).set(_size as f64);

        removed
    }

    /// Removes and returns a uniformly random entry, or `None` when empty.
    pub fn pop_one(&self) -> Option<(String, V)> {
        let (popped, _size) = {
            let mut store = self.store.lock();
            let popped = store.pop_one();
            (popped, store.len())
        };

        if let Some((key, _)) = &popped {
            #[cfg(feature = "metrics")]
            gauge!("cache_size", "cache" => self.config.name.clone()).set(_size as f64);

            #[cfg(feature = "tracing")]
            debug!(cache = %self.config.name, key = %key, "cache pop");

            self.emit(|instance_name, timestamp| CacheEvent::Pop {
                instance_name,
                timestamp,
                key: key.clone(),
            });
        }

        popped
    }

    /// Returns a snapshot of the live keys.
    pub fn keys(&self) -> HashSet<String> {
        self.store.lock().keys()
    }

    /// Returns `true` if `key` has a live entry. Does not count as a lookup.
    pub fn contains(&self, key: &str) -> bool {
        self.store.lock().get(key).is_some()
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.store.lock().clear();

        #[cfg(feature = "metrics")]
        gauge!("cache_size", "cache" => self.config.name.clone()).set(0.0);
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Returns the eviction policy.
    pub fn policy(&self) -> EvictionPolicy {
        self.config.eviction_policy
    }

    /// Returns the name of this cache instance.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    fn emit(&self, event: impl FnOnce(String, Instant) -> CacheEvent) {
        if !self.config.event_listeners.is_empty() {
            let event = event(self.config.name.clone(), Instant::now());
            self.config.event_listeners.emit(&event);
        }
    }
}

impl<V: Clone + Send + 'static> BoundedCache<V> {
    /// Returns a clone of the value stored under `key`.
    ///
    /// Lookups never change eviction order.
    pub fn lookup(&self, key: &str) -> Result<V, CacheError> {
        let found = self.store.lock().get(key).cloned();

        match found {
            Some(value) => {
                #[cfg(feature = "metrics")]
                counter!("cache_requests_total", "cache" => self.config.name.clone(), "result" => "hit")
                    .increment(1);

                #[cfg(feature = "tracing")]
                debug!(cache = %self.config.name, key = %key, "cache hit");

                self.emit(|instance_name, timestamp| CacheEvent::Hit {
                    instance_name,
                    timestamp,
                    key: key.to_string(),
                });
                Ok(value)
            }
            None => {
                #[cfg(feature = "metrics")]
                counter!("cache_requests_total", "cache" => self.config.name.clone(), "result" => "miss")
                    .increment(1);

                #[cfg(feature = "tracing")]
                debug!(cache = %self.config.name, key = %key, "cache miss");

                self.emit(|instance_name, timestamp| CacheEvent::Miss {
                    instance_name,
                    timestamp,
                    key: key.to_string(),
                });
                Err(CacheError::KeyNotFound {
                    key: key.to_string(),
                })
            }
        }
    }

    /// Returns a copy of every live entry, in no particular order.
    pub fn snapshot(&self) -> Vec<(String, V)> {
        self.store.lock().snapshot()
    }
}

impl<V> Clone for BoundedCache<V> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            store: Arc::clone(&self.store),
        }
    }
}

impl<V> fmt::Debug for BoundedCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedCache")
            .field("name", &self.config.name)
            .field("capacity", &self.config.capacity)
            .field("policy", &self.config.eviction_policy)
            .finish_non_exhaustive()
    }
}
