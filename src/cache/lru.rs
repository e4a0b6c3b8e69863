//! Recency Index Module
//!
//! Orders coordinate keys by last use so the store can evict the one
//! nobody asked about for the longest time.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

// == LRU Tracker ==
/// Least-recently-used ordering over cache keys.
///
/// Each use stamps the key with a monotonically increasing tick. The
/// `by_tick` map keeps keys in use order, `ticks` finds a key's current
/// stamp, so touch and eviction are both O(log n).
#[derive(Debug)]
pub struct LruTracker<K> {
    next_tick: u64,
    ticks: HashMap<K, u64>,
    by_tick: BTreeMap<u64, K>,
}

impl<K: Hash + Eq + Clone> LruTracker<K> {
    pub fn new() -> Self {
        Self {
            next_tick: 0,
            ticks: HashMap::new(),
            by_tick: BTreeMap::new(),
        }
    }

    // == Touch ==
    /// Records a use of `key`, making it the most recently used.
    pub fn touch(&mut self, key: &K) {
        let tick = self.next_tick;
        self.next_tick += 1;

        if let Some(previous) = self.ticks.insert(key.clone(), tick) {
            self.by_tick.remove(&previous);
        }
        self.by_tick.insert(tick, key.clone());
    }

    /// Forgets `key`. Unknown keys are ignored.
    pub fn remove(&mut self, key: &K) {
        if let Some(tick) = self.ticks.remove(key) {
            self.by_tick.remove(&tick);
        }
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<K> {
        let (_, key) = self.by_tick.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

impl<K: Hash + Eq + Clone> Default for LruTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}
