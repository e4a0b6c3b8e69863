//! API Module
//!
//! HTTP handlers and routing for the forecast REST API.
//!
//! # Endpoints
//! - `GET /forecast` - Next forecast sample for a position
//! - `GET /forecast/extended` - All forecast samples in a time range
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;
pub mod selection;

pub use handlers::*;
pub use routes::create_router;
