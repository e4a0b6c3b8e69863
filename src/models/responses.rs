//! Response DTOs for the forecast API
//!
//! Defines the structure of outgoing HTTP response bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::forecast::WeatherSample;

/// Response body for the forecast endpoints
///
/// An empty `weather_data` turns into `204 No Content` with no body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    pub weather_data: Vec<WeatherSample>,
    pub message: String,
    pub code: u16,
}

impl ForecastResponse {
    /// Wraps the selected samples
    pub fn ok(weather_data: Vec<WeatherSample>) -> Self {
        let code = if weather_data.is_empty() {
            StatusCode::NO_CONTENT
        } else {
            StatusCode::OK
        };
        Self {
            weather_data,
            message: "OK".to_string(),
            code: code.as_u16(),
        }
    }
}

impl IntoResponse for ForecastResponse {
    fn into_response(self) -> Response {
        if self.weather_data.is_empty() {
            return StatusCode::NO_CONTENT.into_response();
        }
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Share of lookups answered without an upstream call
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
