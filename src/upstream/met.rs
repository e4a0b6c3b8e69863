//! MET Norway Client Module
//!
//! [`ForecastGateway`] implementation for `api.met.no` locationforecast.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, EXPIRES, IF_MODIFIED_SINCE, LAST_MODIFIED};
use reqwest::{Response, StatusCode};
use tracing::{debug, error, info, warn};

use super::payload::{parse_forecast, parse_http_date};
use super::{ForecastGateway, Revalidation};
use crate::error::FetchError;
use crate::forecast::{Coordinates, Forecast};

/// Path of the compact forecast product, appended to the base URL.
pub const FORECAST_PATH: &str = "/weatherapi/locationforecast/2.0/compact";

// == Met Client ==
/// HTTP client for the MET Norway forecast API.
///
/// The upstream rejects requests without an identifying `User-Agent`, so
/// one is required at construction.
#[derive(Debug, Clone)]
pub struct MetClient {
    client: reqwest::Client,
    base_url: String,
}

impl MetClient {
    // == Constructor ==
    /// Creates a client with the given identity and call timeout.
    ///
    /// # Arguments
    /// * `base_url` - Scheme and host, e.g. `https://api.met.no`
    /// * `user_agent` - Identifying `User-Agent` sent with every request
    /// * `timeout` - Upper bound for a whole request/response exchange
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of the forecast endpoint (without query string).
    pub fn forecast_url(&self) -> String {
        format!("{}{}", self.base_url, FORECAST_PATH)
    }

    // == Request ==
    /// Performs one GET and maps the status onto a revalidation outcome.
    async fn request(&self, coordinates: &Coordinates, if_modified_since: Option<&str>) -> Revalidation {
        let mut request = self.client.get(self.forecast_url()).query(&[
            ("lat", coordinates.latitude()),
            ("lon", coordinates.longitude()),
        ]);

        if let Some(token) = if_modified_since {
            request = request.header(IF_MODIFIED_SINCE, token);
        }

        debug!("Requesting forecast for {}", coordinates);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Error when calling forecast API for {}: {}", coordinates, e);
                return Revalidation::Failed(FetchError::Transport(e.to_string()));
            }
        };

        match response.status() {
            StatusCode::NOT_MODIFIED => {
                info!("304 received for {}, previous forecast still valid", coordinates);
                Revalidation::Unchanged
            }
            StatusCode::TOO_MANY_REQUESTS => {
                error!(
                    "Upstream is throttling requests. Consider reducing request volume or increasing cache TTL"
                );
                Revalidation::Failed(FetchError::Throttled)
            }
            StatusCode::NON_AUTHORITATIVE_INFORMATION => {
                warn!("Forecast API reports this product as deprecated or in beta. Check api.met.no documentation");
                read_forecast(response).await
            }
            StatusCode::OK => read_forecast(response).await,
            status => {
                warn!("Unexpected response code {} for {}", status, coordinates);
                Revalidation::Failed(FetchError::UnexpectedStatus(status.as_u16()))
            }
        }
    }
}

// == Gateway Implementation ==
#[async_trait]
impl ForecastGateway for MetClient {
    async fn fetch(&self, coordinates: &Coordinates) -> Result<Forecast, FetchError> {
        match self.request(coordinates, None).await {
            Revalidation::Updated(forecast) => Ok(forecast),
            Revalidation::Failed(e) => Err(e),
            // Nothing to compare against without a token
            Revalidation::Unchanged => Err(FetchError::UnexpectedStatus(
                StatusCode::NOT_MODIFIED.as_u16(),
            )),
        }
    }

    async fn conditional_fetch(
        &self,
        coordinates: &Coordinates,
        last_modified: Option<&str>,
    ) -> Revalidation {
        self.request(coordinates, last_modified).await
    }
}

// == Utility Functions ==
async fn read_forecast(response: Response) -> Revalidation {
    let last_modified = header_string(response.headers(), LAST_MODIFIED);
    let expires_at = header_string(response.headers(), EXPIRES)
        .as_deref()
        .and_then(parse_http_date);

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to read forecast body: {}", e);
            return Revalidation::Failed(FetchError::Transport(e.to_string()));
        }
    };

    if body.trim().is_empty() {
        return Revalidation::Failed(FetchError::PayloadInvalid("empty body".to_string()));
    }

    match parse_forecast(&body, last_modified, expires_at) {
        Ok(forecast) => Revalidation::Updated(forecast),
        Err(e) => {
            error!("Could not parse forecast body: {}", e);
            Revalidation::Failed(e)
        }
    }
}

fn header_string(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
