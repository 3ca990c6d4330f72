//! Cache eviction policies.
//!
//! Both policies evict the oldest live entry when a new key arrives at a full
//! cache. They differ in how the store is laid out for [`pop_one`], which
//! removes a uniformly random entry under either policy.
//!
//! [`pop_one`]: crate::BoundedCache::pop_one

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::Rng;
use std::collections::{HashMap, VecDeque};

/// Eviction policy for the cache.
///
/// Determines how entries are stored and which operations are cheap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// First In, First Out - evicts the oldest live entry regardless of how
    /// often it was read.
    ///
    /// Updating an existing key keeps its original position. `pop_one` is
    /// supported but walks the table.
    #[default]
    Fifo,

    /// FIFO eviction on overflow, with entries kept in a dense table so
    /// `pop_one` draws a random entry in constant time.
    ///
    /// Suited to tracking in-flight entities that are later drained one at a
    /// time.
    RandomPop,
}

/// Trait for cache storage implementations with different eviction policies.
pub(crate) trait EvictionStore<V>: Send {
    /// Gets a value from the cache.
    fn get(&self, key: &str) -> Option<&V>;

    /// Inserts or overwrites a value.
    /// Returns the evicted entry if a new key overflowed the capacity.
    fn insert(&mut self, key: String, value: V) -> Option<(String, V)>;

    /// Removes a specific key from the cache.
    fn remove(&mut self, key: &str) -> Option<V>;

    /// Removes a uniformly random entry.
    fn pop_random(&mut self, rng: &mut StdRng) -> Option<(String, V)>;

    /// Iterates over live entries in no particular order.
    fn iter(&self) -> Box<dyn Iterator<Item = (&String, &V)> + '_>;

    /// Returns the current number of entries.
    fn len(&self) -> usize;

    /// Clears all entries.
    fn clear(&mut self);
}

/// FIFO (First In, First Out) cache storage.
///
/// Every entry carries the sequence number it was inserted with. The order
/// queue can therefore hold stale records for keys that were deleted (or
/// deleted and re-inserted) since; those are skipped when looking for a
/// victim.
pub(crate) struct FifoStore<V> {
    data: HashMap<String, (u64, V)>,
    order: VecDeque<(u64, String)>,
    capacity: usize,
    next_seq: u64,
}

impl<V> FifoStore<V> {
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
            next_seq: 0,
        }
    }

    fn is_live(&self, seq: u64, key: &str) -> bool {
        matches!(self.data.get(key), Some((s, _)) if *s == seq)
    }

    /// Pops order records until one names a live entry, and removes it.
    fn evict_oldest(&mut self) -> Option<(String, V)> {
        while let Some((seq, key)) = self.order.pop_front() {
            if self.is_live(seq, &key) {
                let (_, value) = self.data.remove(&key)?;
                return Some((key, value));
            }
        }
        None
    }

    /// Drops stale order records once they outnumber live entries.
    fn compact(&mut self) {
        if self.order.len() > self.capacity.saturating_mul(2) {
            let data = &self.data;
            self.order
                .retain(|(seq, key)| matches!(data.get(key), Some((s, _)) if s == seq));
        }
    }
}

impl<V: Send> EvictionStore<V> for FifoStore<V> {
    fn get(&self, key: &str) -> Option<&V> {
        self.data.get(key).map(|(_, v)| v)
    }

    fn insert(&mut self, key: String, value: V) -> Option<(String, V)> {
        // Existing key: replace value, keep position
        if let Some((_, slot)) = self.data.get_mut(&key) {
            *slot = value;
            return None;
        }

        let evicted = if self.data.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        self.data.insert(key.clone(), (seq, value));
        self.order.push_back((seq, key));
        self.compact();

        evicted
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        let (_, value) = self.data.remove(key)?;
        self.compact();
        Some(value)
    }

    fn pop_random(&mut self, rng: &mut StdRng) -> Option<(String, V)> {
        let key = self.data.keys().choose(rng)?.clone();
        let (_, value) = self.data.remove(&key)?;
        self.compact();
        Some((key, value))
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&String, &V)> + '_> {
        Box::new(self.data.iter().map(|(k, (_, v))| (k, v)))
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn clear(&mut self) {
        self.data.clear();
        self.order.clear();
    }
}

/// FIFO-evicting storage optimized for random pops.
///
/// Entries live in a dense vector so a uniformly random pick is one index
/// draw away. Each key's slot records its insertion sequence and its index;
/// the order queue uses the same stale-record skipping as [`FifoStore`].
pub(crate) struct RandomPopStore<V> {
    entries: Vec<(String, V)>,
    slots: HashMap<String, (u64, usize)>,
    order: VecDeque<(u64, String)>,
    capacity: usize,
    next_seq: u64,
}

impl<V> RandomPopStore<V> {
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
            next_seq: 0,
        }
    }

    fn remove_at(&mut self, index: usize) -> (String, V) {
        let (key, value) = self.entries.swap_remove(index);
        self.slots.remove(&key);
        if let Some((moved, _)) = self.entries.get(index) {
            if let Some(slot) = self.slots.get_mut(moved) {
                slot.1 = index;
            }
        }
        (key, value)
    }

    fn evict_oldest(&mut self) -> Option<(String, V)> {
        while let Some((seq, key)) = self.order.pop_front() {
            match self.slots.get(&key) {
                Some(&(s, index)) if s == seq => return Some(self.remove_at(index)),
                _ => {}
            }
        }
        None
    }

    fn compact(&mut self) {
        if self.order.len() > self.capacity.saturating_mul(2) {
            let slots = &self.slots;
            self.order
                .retain(|(seq, key)| matches!(slots.get(key), Some((s, _)) if s == seq));
        }
    }
}

impl<V: Send> EvictionStore<V> for RandomPopStore<V> {
    fn get(&self, key: &str) -> Option<&V> {
        let (_, index) = *self.slots.get(key)?;
        self.entries.get(index).map(|(_, v)| v)
    }

    fn insert(&mut self, key: String, value: V) -> Option<(String, V)> {
        if let Some(&(_, index)) = self.slots.get(&key) {
            self.entries[index].1 = value;
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        self.slots.insert(key.clone(), (seq, self.entries.len()));
        self.order.push_back((seq, key.clone()));
        self.entries.push((key, value));
        self.compact();

        evicted
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        let (_, index) = *self.slots.get(key)?;
        let (_, value) = self.remove_at(index);
        self.compact();
        Some(value)
    }

    fn pop_random(&mut self, rng: &mut StdRng) -> Option<(String, V)> {
        if self.entries.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.entries.len());
        let popped = self.remove_at(index);
        self.compact();
        Some(popped)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&String, &V)> + '_> {
        Box::new(self.entries.iter().map(|(k, v)| (k, v)))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.slots.clear();
        self.order.clear();
    }
}
