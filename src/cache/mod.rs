//! Cache Module
//!
//! Forecast cache with conditional revalidation, stale fallback, absolute
//! TTL and LRU eviction.

mod engine;
mod entry;
mod flight;
mod lru;
mod stats;
mod store;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export public types
pub use engine::ForecastCache;
pub use entry::CachedForecast;
pub use flight::FlightGroup;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::ForecastStore;

// == Public Constants ==
/// Maximum age of `updated_at` for an entry to count as fresh when no
/// valid `Expires` header applies (2 hours).
pub const FRESHNESS_WINDOW_SECS: i64 = 2 * 60 * 60;
