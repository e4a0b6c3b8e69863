//! Sample Selection
//!
//! Picks the samples a forecast endpoint returns out of a cached series.
//! Both helpers rely on the series being sorted by time.

use chrono::{DateTime, Utc};

use crate::forecast::WeatherSample;

/// The sample with the nearest timestamp strictly after `now`.
pub fn nearest_future_sample(series: &[WeatherSample], now: DateTime<Utc>) -> Option<&WeatherSample> {
    series.iter().find(|sample| sample.time > now)
}

/// Every sample with `start <= time <= end`.
pub fn samples_within(
    series: &[WeatherSample],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<WeatherSample> {
    series
        .iter()
        .skip_while(|sample| sample.time < start)
        .take_while(|sample| sample.time <= end)
        .cloned()
        .collect()
}
