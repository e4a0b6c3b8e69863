//! Forecast Cache - A caching front for the MET Norway forecast API
//!
//! Serves weather forecasts per coordinate with conditional revalidation,
//! stale fallback, absolute TTL and LRU eviction.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod forecast;
pub mod models;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use cache::ForecastCache;
pub use config::Config;
pub use forecast::{Coordinates, Forecast, WeatherSample};
pub use tasks::spawn_cleanup_task;
pub use upstream::{ForecastGateway, MetClient, Revalidation};
