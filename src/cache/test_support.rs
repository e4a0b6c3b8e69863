//! Shared fixtures for cache tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::FetchError;
use crate::forecast::{Coordinates, Forecast, WeatherSample};
use crate::upstream::{ForecastGateway, Revalidation};

/// Token attached to every fixture forecast.
pub const TOKEN: &str = "Sat, 01 Jun 2024 10:00:00 GMT";

// == Scripted Gateway ==
/// Gateway answering from queues and counting calls.
#[derive(Default)]
pub struct ScriptedGateway {
    pub fetches: Mutex<Vec<Result<Forecast, FetchError>>>,
    pub revalidations: Mutex<Vec<Revalidation>>,
    pub fetch_calls: AtomicUsize,
    pub conditional_calls: AtomicUsize,
    pub tokens: Mutex<Vec<Option<String>>>,
    pub panic_on_call: bool,
}

impl ScriptedGateway {
    pub fn fetching(result: Result<Forecast, FetchError>) -> Self {
        let gateway = Self::default();
        gateway.fetches.lock().unwrap().push(result);
        gateway
    }

    pub fn revalidating(outcome: Revalidation) -> Self {
        let gateway = Self::default();
        gateway.revalidations.lock().unwrap().push(outcome);
        gateway
    }

    pub fn calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst) + self.conditional_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ForecastGateway for ScriptedGateway {
    async fn fetch(&self, _coordinates: &Coordinates) -> Result<Forecast, FetchError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_on_call {
            panic!("gateway exploded");
        }
        self.fetches
            .lock()
            .unwrap()
            .pop()
            .unwrap_or(Err(FetchError::Transport("no scripted response".to_string())))
    }

    async fn conditional_fetch(
        &self,
        _coordinates: &Coordinates,
        last_modified: Option<&str>,
    ) -> Revalidation {
        self.conditional_calls.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().unwrap().push(last_modified.map(str::to_string));
        if self.panic_on_call {
            panic!("gateway exploded");
        }
        self.revalidations
            .lock()
            .unwrap()
            .pop()
            .unwrap_or(Revalidation::Failed(FetchError::Throttled))
    }
}

/// One-sample forecast carrying [`TOKEN`].
pub fn forecast(
    updated_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    temperature: f64,
) -> Forecast {
    Forecast::new(
        updated_at,
        Some(TOKEN.to_string()),
        expires_at,
        vec![WeatherSample::new(updated_at, Some(5.0), Some(temperature))],
    )
}
