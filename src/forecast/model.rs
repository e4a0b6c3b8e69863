//! Forecast Model Module
//!
//! Defines the forecast value the gateway produces and the cache stores.

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Weather Sample ==
/// A single point in the forecast time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSample {
    /// Instant the sample applies to
    pub time: DateTime<Utc>,
    /// Wind speed in m/s, if the upstream reported one
    pub wind_speed: Option<f64>,
    /// Air temperature in degrees Celsius, if the upstream reported one
    pub air_temperature: Option<f64>,
}

impl WeatherSample {
    pub fn new(time: DateTime<Utc>, wind_speed: Option<f64>, air_temperature: Option<f64>) -> Self {
        Self {
            time,
            wind_speed,
            air_temperature,
        }
    }
}

// == Forecast ==
/// A forecast for one coordinate as returned by the upstream.
///
/// Once built the series is never modified; a newer upstream payload
/// produces a whole new `Forecast`.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    updated_at: DateTime<Utc>,
    last_modified: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    series: Vec<WeatherSample>,
}

impl Forecast {
    // == Constructor ==
    /// Builds a forecast, ordering the series by time and dropping
    /// samples whose timestamp was already seen.
    ///
    /// # Arguments
    /// * `updated_at` - The upstream's own "updated at" instant
    /// * `last_modified` - Revalidation token from the `Last-Modified` header
    /// * `expires_at` - Parsed `Expires` header, if present and valid
    /// * `series` - Samples in any order
    pub fn new(
        updated_at: DateTime<Utc>,
        last_modified: Option<String>,
        expires_at: Option<DateTime<Utc>>,
        mut series: Vec<WeatherSample>,
    ) -> Self {
        // Stable sort keeps the first occurrence ahead of later duplicates
        series.sort_by_key(|sample| sample.time);
        series.dedup_by_key(|sample| sample.time);

        Self {
            updated_at,
            last_modified,
            expires_at,
            series,
        }
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Opaque token echoed back to the upstream as `If-Modified-Since`.
    pub fn last_modified(&self) -> Option<&str> {
        self.last_modified.as_deref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Samples ascending by time.
    pub fn series(&self) -> &[WeatherSample] {
        &self.series
    }
}
