//! Upstream Payload Module
//!
//! Parses the `locationforecast/2.0/compact` GeoJSON body and HTTP-date
//! headers into a [`Forecast`].

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::error::FetchError;
use crate::forecast::{Forecast, WeatherSample};

// == Wire Types ==
// Only the fields the cache needs; everything else is ignored.

#[derive(Debug, Deserialize)]
struct MetResponse {
    properties: Option<Properties>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    meta: Option<Meta>,
    timeseries: Option<Vec<TimeStep>>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct TimeStep {
    time: DateTime<Utc>,
    data: Option<StepData>,
}

#[derive(Debug, Deserialize)]
struct StepData {
    instant: Option<InstantData>,
}

#[derive(Debug, Deserialize)]
struct InstantData {
    details: Option<Details>,
}

#[derive(Debug, Default, Deserialize)]
struct Details {
    wind_speed: Option<f64>,
    air_temperature: Option<f64>,
}

// == Parse Forecast ==
/// Parses an upstream body into a forecast.
///
/// Fails with [`FetchError::PayloadInvalid`] when the body is not JSON or
/// lacks `properties.meta.updated_at` or `properties.timeseries`. Samples
/// missing a detail value keep it as `None`.
///
/// # Arguments
/// * `body` - Raw response body
/// * `last_modified` - Value of the `Last-Modified` header
/// * `expires_at` - Parsed `Expires` header
pub fn parse_forecast(
    body: &str,
    last_modified: Option<String>,
    expires_at: Option<DateTime<Utc>>,
) -> Result<Forecast, FetchError> {
    let response: MetResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::PayloadInvalid(format!("malformed JSON: {}", e)))?;

    let properties = response
        .properties
        .ok_or_else(|| FetchError::PayloadInvalid("missing properties".to_string()))?;

    let updated_at = properties
        .meta
        .and_then(|meta| meta.updated_at)
        .ok_or_else(|| FetchError::PayloadInvalid("missing properties.meta.updated_at".to_string()))?;

    let timeseries = properties
        .timeseries
        .ok_or_else(|| FetchError::PayloadInvalid("missing properties.timeseries".to_string()))?;

    let series = timeseries.into_iter().map(into_sample).collect();

    Ok(Forecast::new(updated_at, last_modified, expires_at, series))
}

fn into_sample(step: TimeStep) -> WeatherSample {
    let details = step
        .data
        .and_then(|data| data.instant)
        .and_then(|instant| instant.details)
        .unwrap_or_default();

    if details.wind_speed.is_none() || details.air_temperature.is_none() {
        warn!("Sample at {} is missing wind_speed or air_temperature", step.time);
    }

    WeatherSample::new(step.time, details.wind_speed, details.air_temperature)
}

// == Parse HTTP Date ==
/// Parses an HTTP-date header value (`Sat, 01 Jun 2024 10:00:00 GMT`).
///
/// Returns `None` for anything unparseable so a bad `Expires` header only
/// disables that freshness signal.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc2822(value.trim()) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(e) => {
            warn!("Ignoring unparseable HTTP date '{}': {}", value, e);
            None
        }
    }
}
