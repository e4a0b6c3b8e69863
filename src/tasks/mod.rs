//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - TTL Sweep: Drops forecasts past their absolute lifetime at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
