//! TTL Sweep Task
//!
//! Periodically drops cached forecasts whose absolute lifetime has run out,
//! so memory is reclaimed for coordinates nobody asks about anymore.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ForecastStore;

/// Spawns a background task that sweeps expired forecasts from the store.
///
/// Lookups already ignore expired entries on their own; the sweep only
/// bounds how long an untouched entry keeps its memory.
///
/// # Arguments
/// * `store` - Store shared with the cache engine
/// * `interval_secs` - Seconds between sweeps
///
/// # Returns
/// A JoinHandle to abort the task during graceful shutdown.
pub fn spawn_cleanup_task(store: Arc<RwLock<ForecastStore>>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting forecast sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let (removed, remaining) = {
                let mut store = store.write().await;
                let removed = store.cleanup_expired(Utc::now());
                (removed, store.len())
            };

            if removed > 0 {
                info!(
                    "Forecast sweep: removed {} expired entries, {} remaining",
                    removed, remaining
                );
            } else {
                debug!("Forecast sweep: no expired entries found");
            }
        }
    })
}
