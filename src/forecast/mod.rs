//! Forecast Domain Module
//!
//! Coordinate keys and the forecast values produced by the upstream gateway.

mod coordinates;
mod model;

pub use coordinates::Coordinates;
pub use model::{Forecast, WeatherSample};
