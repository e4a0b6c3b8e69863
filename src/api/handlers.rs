//! API Handlers
//!
//! HTTP request handlers for each forecast service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use tracing::warn;

use super::selection::{nearest_future_sample, samples_within};
use crate::cache::ForecastCache;
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::forecast::{Coordinates, Forecast};
use crate::models::{ForecastQuery, ForecastResponse, HealthResponse, StatsResponse};
use crate::upstream::{ForecastGateway, MetClient};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Forecast cache engine
    pub cache: Arc<ForecastCache>,
}

impl AppState {
    /// Creates a new AppState around an existing engine.
    pub fn new(cache: ForecastCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the MET client and an engine with the configured bounds.
    pub fn from_config(config: &Config) -> std::result::Result<Self, reqwest::Error> {
        let client = MetClient::new(
            config.met_base_url.as_str(),
            &config.user_agent,
            config.upstream_timeout(),
        )?;
        Ok(Self::with_gateway(Arc::new(client), config))
    }

    /// Creates a new AppState with any gateway and the configured bounds.
    pub fn with_gateway(gateway: Arc<dyn ForecastGateway>, config: &Config) -> Self {
        Self::new(ForecastCache::new(gateway, config.max_entries, config.cache_ttl))
    }
}

/// Handler for GET /forecast
///
/// Returns the sample closest to now that is still in the future.
pub async fn forecast_handler(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<ForecastResponse> {
    let forecast = lookup(&state, &query).await?;

    let samples: Vec<_> = nearest_future_sample(forecast.series(), Utc::now())
        .cloned()
        .into_iter()
        .collect();
    if samples.is_empty() {
        warn!(
            "No upcoming forecast sample for ({}, {}) between {} and {}",
            query.lat, query.lon, query.start_date_time, query.end_date_time
        );
    }

    Ok(ForecastResponse::ok(samples))
}

/// Handler for GET /forecast/extended
///
/// Returns every sample between `startDateTime` and `endDateTime` inclusive.
pub async fn extended_forecast_handler(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<ForecastResponse> {
    let forecast = lookup(&state, &query).await?;

    let samples = samples_within(forecast.series(), query.start_date_time, query.end_date_time);
    if samples.is_empty() {
        warn!(
            "No forecast samples for ({}, {}) between {} and {}",
            query.lat, query.lon, query.start_date_time, query.end_date_time
        );
    }

    Ok(ForecastResponse::ok(samples))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats().await))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

async fn lookup(state: &AppState, query: &ForecastQuery) -> Result<Arc<Forecast>> {
    if let Some(error_msg) = query.validate(Utc::now()) {
        warn!("Rejected forecast query: {}", error_msg);
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let coordinates = Coordinates::new(query.lat, query.lon);
    state.cache.get_forecast(coordinates).await.ok_or_else(|| {
        warn!(
            "Unable to retrieve a forecast for {} from cache or upstream",
            coordinates
        );
        ApiError::NotFound(coordinates.to_string())
    })
}
