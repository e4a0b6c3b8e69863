//! Upstream Gateway Module
//!
//! The contract the cache engine uses to reach the forecast provider, and
//! the MET Norway implementation of it.

mod met;
mod payload;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::forecast::{Coordinates, Forecast};

pub use met::{MetClient, FORECAST_PATH};
pub use payload::parse_forecast;

// == Revalidation Outcome ==
/// Result of asking the upstream whether a cached forecast changed.
#[derive(Debug, Clone, PartialEq)]
pub enum Revalidation {
    /// Upstream confirmed nothing newer exists
    Unchanged,
    /// Upstream returned a new payload
    Updated(Forecast),
    /// Upstream could not be reached or answered unusably
    Failed(FetchError),
}

// == Forecast Gateway ==
/// Source of forecasts for the cache engine.
///
/// Implementations map provider-specific signals (not modified, throttled,
/// deprecated, transport errors) onto the outcomes above.
#[async_trait]
pub trait ForecastGateway: Send + Sync {
    /// Unconditional retrieval.
    async fn fetch(&self, coordinates: &Coordinates) -> Result<Forecast, FetchError>;

    /// Retrieval guarded by the token from a previous response.
    async fn conditional_fetch(
        &self,
        coordinates: &Coordinates,
        last_modified: Option<&str>,
    ) -> Revalidation;
}
