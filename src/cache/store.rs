//! Forecast Store Module
//!
//! Bounded map from coordinate key to cached forecast, combining HashMap
//! storage with LRU tracking and an absolute TTL.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::cache::{CacheStats, CachedForecast, LruTracker};
use crate::forecast::{Coordinates, Forecast};

/// Largest TTL chrono can represent as a duration.
const MAX_TTL_SECS: i64 = i64::MAX / 1000;

// == Forecast Store ==
/// Cache storage with LRU eviction and absolute TTL.
///
/// Holds at most one entry per normalized coordinate. Freshness is not
/// judged here; the store only decides whether an entry exists at all.
#[derive(Debug)]
pub struct ForecastStore {
    /// Entries by coordinate key
    entries: HashMap<Coordinates, CachedForecast>,
    /// LRU access tracker
    lru: LruTracker<Coordinates>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Absolute time-to-live measured from `stored_at`
    ttl: Duration,
}

impl ForecastStore {
    // == Constructor ==
    /// Creates a new store.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the store can hold
    /// * `ttl_secs` - Absolute lifetime of an entry in seconds
    pub fn new(max_entries: usize, ttl_secs: u64) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            ttl: Duration::seconds(i64::try_from(ttl_secs).unwrap_or(i64::MAX).min(MAX_TTL_SECS)),
        }
    }

    // == Get ==
    /// Returns the entry for `key` and marks it recently used.
    ///
    /// An entry past its TTL is removed and reported as absent.
    pub fn get(&mut self, key: &Coordinates, now: DateTime<Utc>) -> Option<CachedForecast> {
        let expired = self.entries.get(key)?.is_expired_at(now, self.ttl);

        if expired {
            self.remove_entry(key);
            self.stats.record_eviction();
            return None;
        }

        self.lru.touch(key);
        self.entries.get(key).cloned()
    }

    // == Peek ==
    /// Returns the entry for `key` without touching LRU order.
    pub fn peek(&self, key: &Coordinates, now: DateTime<Utc>) -> Option<CachedForecast> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now, self.ttl))
            .cloned()
    }

    // == Insert ==
    /// Stores a forecast, replacing any entry for the same key.
    ///
    /// If the store is at capacity, the least recently used entry is
    /// evicted first. A store with zero capacity keeps nothing.
    pub fn insert(
        &mut self,
        key: Coordinates,
        forecast: Arc<Forecast>,
        now: DateTime<Utc>,
    ) -> CachedForecast {
        let entry = CachedForecast::new(forecast, now);

        if self.max_entries == 0 {
            return entry;
        }

        let is_overwrite = self.entries.contains_key(&key);
        if !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
            }
        }

        self.entries.insert(key, entry.clone());
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());

        entry
    }

    // == Cleanup Expired ==
    /// Removes all entries past their TTL.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self, now: DateTime<Utc>) -> usize {
        let expired_keys: Vec<Coordinates> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now, self.ttl))
            .map(|(key, _)| *key)
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
            self.stats.record_eviction();
        }

        expired_keys.len()
    }

    // == Stats ==
    /// Returns a snapshot of the statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Mutable access for the engine to record lookup outcomes.
    pub fn stats_mut(&mut self) -> &mut CacheStats {
        &mut self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    fn remove_entry(&mut self, key: &Coordinates) {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
    }
}
