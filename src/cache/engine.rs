//! Forecast Cache Engine
//!
//! Decides per lookup whether to serve a cached forecast, revalidate it
//! with the upstream, or fall back to a stale copy when the upstream fails.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::task::JoinError;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheStats, CachedForecast, FlightGroup, ForecastStore};
use crate::error::FetchError;
use crate::forecast::{Coordinates, Forecast};
use crate::upstream::{ForecastGateway, Revalidation};

// == Forecast Cache ==
/// Read-through forecast cache in front of a [`ForecastGateway`].
///
/// The store lock is only held for in-memory work, never across an
/// upstream call, so lookups for different coordinates never wait on each
/// other. Calls for the same coordinate go through a single flight.
pub struct ForecastCache {
    store: Arc<RwLock<ForecastStore>>,
    gateway: Arc<dyn ForecastGateway>,
    flights: FlightGroup,
}

impl ForecastCache {
    // == Constructor ==
    /// Creates an engine over an empty store.
    ///
    /// # Arguments
    /// * `gateway` - Upstream forecast source
    /// * `max_entries` - Store capacity before LRU eviction
    /// * `ttl_secs` - Absolute lifetime of a stored entry
    pub fn new(gateway: Arc<dyn ForecastGateway>, max_entries: usize, ttl_secs: u64) -> Self {
        Self::with_store(gateway, ForecastStore::new(max_entries, ttl_secs))
    }

    /// Creates an engine over an existing store.
    pub fn with_store(gateway: Arc<dyn ForecastGateway>, store: ForecastStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            gateway,
            flights: FlightGroup::new(),
        }
    }

    /// Shared handle to the store, for the cleanup task and inspection.
    pub fn store(&self) -> Arc<RwLock<ForecastStore>> {
        Arc::clone(&self.store)
    }

    // == Get Forecast At ==
    /// Convenience wrapper normalizing raw coordinates first.
    pub async fn get_forecast_at(&self, latitude: f64, longitude: f64) -> Option<Arc<Forecast>> {
        self.get_forecast(Coordinates::new(latitude, longitude)).await
    }

    // == Get Forecast ==
    /// Returns a usable forecast for `coordinates`, or `None` when nothing
    /// is cached and the upstream could not provide one.
    ///
    /// Upstream failures never escape: a failed revalidation serves the
    /// stale entry, a failed initial fetch yields `None`.
    pub async fn get_forecast(&self, coordinates: Coordinates) -> Option<Arc<Forecast>> {
        if let Some(forecast) = self.fresh_hit(&coordinates).await {
            return Some(forecast);
        }

        let _flight = self.flights.acquire(coordinates).await;

        // Another caller may have refreshed the entry while we waited
        let cached = self.store.write().await.get(&coordinates, Utc::now());

        match cached {
            Some(entry) if entry.is_fresh_at(Utc::now()) => {
                debug!("Entry for {} refreshed by a concurrent lookup", coordinates);
                self.store.write().await.stats_mut().record_hit();
                Some(entry.forecast)
            }
            Some(entry) => self.revalidate(coordinates, entry).await,
            None => self.load(coordinates).await,
        }
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    // == Fresh Hit ==
    async fn fresh_hit(&self, coordinates: &Coordinates) -> Option<Arc<Forecast>> {
        let mut store = self.store.write().await;
        let now = Utc::now();

        let entry = store.get(coordinates, now)?;
        if !entry.is_fresh_at(now) {
            return None;
        }

        debug!("Returning cached forecast for {} since it has not yet expired", coordinates);
        store.stats_mut().record_hit();
        Some(entry.forecast)
    }

    // == Load ==
    /// Cache miss: unconditional fetch, stored on success.
    async fn load(&self, coordinates: Coordinates) -> Option<Arc<Forecast>> {
        self.store.write().await.stats_mut().record_miss();
        info!("No cached forecast for {}, fetching from upstream", coordinates);

        let gateway = Arc::clone(&self.gateway);
        let result = tokio::spawn(async move { gateway.fetch(&coordinates).await }).await;

        match result {
            Ok(Ok(forecast)) => Some(self.store_forecast(coordinates, forecast).await),
            Ok(Err(e)) => {
                warn!("Initial fetch for {} failed: {}", coordinates, e);
                self.store.write().await.stats_mut().record_fetch_failure();
                None
            }
            Err(e) => self.recover(coordinates, e).await,
        }
    }

    // == Revalidate ==
    /// Stale hit: conditional fetch with the entry's revalidation token.
    async fn revalidate(&self, coordinates: Coordinates, entry: CachedForecast) -> Option<Arc<Forecast>> {
        self.store.write().await.stats_mut().record_revalidation();
        info!("Forecast for {} has expired, revalidating with upstream", coordinates);

        let gateway = Arc::clone(&self.gateway);
        let token = entry.forecast.last_modified().map(str::to_string);
        let result = tokio::spawn(async move {
            gateway
                .conditional_fetch(&coordinates, token.as_deref())
                .await
        })
        .await;

        match result {
            Ok(Revalidation::Unchanged) => {
                debug!("Upstream reports forecast for {} unchanged", coordinates);
                self.store.write().await.stats_mut().record_unchanged();
                Some(entry.forecast)
            }
            Ok(Revalidation::Updated(forecast)) => {
                Some(self.store_forecast(coordinates, forecast).await)
            }
            Ok(Revalidation::Failed(e)) => Some(self.stale_fallback(coordinates, entry, e).await),
            Err(e) => self.recover(coordinates, e).await,
        }
    }

    async fn store_forecast(&self, coordinates: Coordinates, forecast: Forecast) -> Arc<Forecast> {
        let forecast = Arc::new(forecast);
        let mut store = self.store.write().await;
        store.insert(coordinates, Arc::clone(&forecast), Utc::now());
        debug!(
            "Stored forecast for {} with {} samples ({} entries cached)",
            coordinates,
            forecast.series().len(),
            store.len()
        );
        forecast
    }

    async fn stale_fallback(
        &self,
        coordinates: Coordinates,
        entry: CachedForecast,
        error: FetchError,
    ) -> Arc<Forecast> {
        warn!(
            "Revalidation for {} failed ({}), serving stale forecast",
            coordinates, error
        );
        let mut store = self.store.write().await;
        store.stats_mut().record_fetch_failure();
        store.stats_mut().record_stale_fallback();
        entry.forecast
    }

    // == Recover ==
    /// The upstream task itself died. Serve whatever the store still has.
    async fn recover(&self, coordinates: Coordinates, error: JoinError) -> Option<Arc<Forecast>> {
        error!(
            "Failed to retrieve forecast for {}: {}. Returning possible cached value",
            coordinates, error
        );
        let mut store = self.store.write().await;
        store.stats_mut().record_fetch_failure();
        store
            .peek(&coordinates, Utc::now())
            .map(|entry| entry.forecast)
    }
}

impl std::fmt::Debug for ForecastCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastCache")
            .field("in_flight", &self.flights.in_flight())
            .finish_non_exhaustive()
    }
}
