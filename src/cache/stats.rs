//! Cache Statistics Module
//!
//! Counts how lookups were resolved: fresh hits, misses, revalidations and
//! stale fallbacks.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CacheStats {
    /// Lookups served from a fresh entry without an upstream call
    pub hits: u64,
    /// Lookups with no usable entry
    pub misses: u64,
    /// Conditional fetches issued for stale entries
    pub revalidations: u64,
    /// Revalidations answered with "not modified"
    pub unchanged: u64,
    /// Stale entries served because revalidation failed
    pub stale_fallbacks: u64,
    /// Upstream calls that failed (initial fetch or revalidation)
    pub fetch_failures: u64,
    /// Entries dropped by LRU pressure or absolute TTL
    pub evictions: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Share of lookups answered without any upstream call.
    ///
    /// Returns hits / (hits + misses + revalidations), or 0.0 if nothing
    /// was looked up yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses + self.revalidations;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_revalidation(&mut self) {
        self.revalidations += 1;
    }

    pub fn record_unchanged(&mut self) {
        self.unchanged += 1;
    }

    pub fn record_stale_fallback(&mut self) {
        self.stale_fallbacks += 1;
    }

    pub fn record_fetch_failure(&mut self) {
        self.fetch_failures += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
