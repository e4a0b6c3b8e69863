//! Request DTOs for the forecast API
//!
//! Defines the query parameters accepted by the forecast endpoints.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// Furthest a start date may lie ahead of today, in days.
pub const MAX_DAYS_AHEAD: i64 = 7;

/// Query string for `GET /forecast` and `GET /forecast/extended`
///
/// # Fields
/// - `lat` / `lon`: Position in decimal degrees
/// - `startDateTime` / `endDateTime`: RFC 3339 instants bounding the event
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastQuery {
    pub lat: f64,
    pub lon: f64,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
}

impl ForecastQuery {
    /// Validates the query against the current instant.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self, now: DateTime<Utc>) -> Option<String> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Some(format!("Latitude {} is outside [-90, 90]", self.lat));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Some(format!("Longitude {} is outside [-180, 180]", self.lon));
        }
        if !is_within_next_week(self.start_date_time, now) {
            return Some("Request is not within the next 7 days".to_string());
        }
        if self.start_date_time > self.end_date_time {
            return Some("startDateTime must not be after endDateTime".to_string());
        }
        None
    }
}

/// Whether `start` falls on a UTC calendar date from today to today + 7.
pub fn is_within_next_week(start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    let today = now.date_naive();
    let start_date = start.date_naive();
    start_date >= today && start_date <= today + Duration::days(MAX_DAYS_AHEAD)
}
