//! Cache Entry Module
//!
//! A stored forecast plus the bookkeeping needed for freshness and TTL.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::cache::FRESHNESS_WINDOW_SECS;
use crate::forecast::Forecast;

// == Cached Forecast ==
/// Represents a single cache entry.
#[derive(Debug, Clone)]
pub struct CachedForecast {
    /// The stored forecast, shared with callers
    pub forecast: Arc<Forecast>,
    /// When this process wrote the entry
    pub stored_at: DateTime<Utc>,
}

impl CachedForecast {
    // == Constructor ==
    pub fn new(forecast: Arc<Forecast>, stored_at: DateTime<Utc>) -> Self {
        Self { forecast, stored_at }
    }

    // == Is Fresh ==
    /// Checks whether the entry can be served without asking the upstream.
    ///
    /// A future `Expires` instant wins over everything else. Without one
    /// (missing, unparseable or already passed) the entry is fresh while
    /// its `updated_at` is less than two hours old.
    ///
    /// # Arguments
    /// * `now` - The instant to evaluate against
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        if let Some(expires_at) = self.forecast.expires_at() {
            if now < expires_at {
                return true;
            }
        }

        self.age_at(now) < Duration::seconds(FRESHNESS_WINDOW_SECS)
    }

    // == Age ==
    /// Age of the upstream data, clamped at zero for `updated_at` values
    /// in the future.
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        let age = now - self.forecast.updated_at();
        if age < Duration::zero() {
            Duration::zero()
        } else {
            age
        }
    }

    // == Is Expired ==
    /// Checks the absolute time-to-live, measured from when the entry was
    /// stored. Expired once `now >= stored_at + ttl`.
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.stored_at >= ttl
    }
}
