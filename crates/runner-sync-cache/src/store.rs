//! Cache storage implementation.

use crate::eviction::{EvictionPolicy, EvictionStore, FifoStore, RandomPopStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

/// Cache store with a configurable eviction policy and its own random source.
pub(crate) struct CacheStore<V> {
    store: Box<dyn EvictionStore<V>>,
    rng: StdRng,
}

impl<V: Send + 'static> CacheStore<V> {
    /// Creates a new store. A `seed` makes `pop_one` reproducible.
    pub(crate) fn new(capacity: usize, policy: EvictionPolicy, seed: Option<u64>) -> Self {
        let store: Box<dyn EvictionStore<V>> = match policy {
            EvictionPolicy::Fifo => Box::new(FifoStore::new(capacity)),
            EvictionPolicy::RandomPop => Box::new(RandomPopStore::new(capacity)),
        };
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self { store, rng }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&V> {
        self.store.get(key)
    }

    /// Inserts a value into the cache.
    /// Returns the evicted entry if the cache was full.
    pub(crate) fn insert(&mut self, key: String, value: V) -> Option<(String, V)> {
        self.store.insert(key, value)
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<V> {
        self.store.remove(key)
    }

    pub(crate) fn pop_one(&mut self) -> Option<(String, V)> {
        self.store.pop_random(&mut self.rng)
    }

    pub(crate) fn keys(&self) -> HashSet<String> {
        self.store.iter().map(|(k, _)| k.clone()).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.store.len()
    }

    pub(crate) fn clear(&mut self) {
        self.store.clear();
    }
}

impl<V: Clone + Send + 'static> CacheStore<V> {
    pub(crate) fn snapshot(&self) -> Vec<(String, V)> {
        self.store
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
