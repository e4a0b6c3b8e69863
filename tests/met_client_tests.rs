//! Integration Tests for the MET Client
//!
//! Runs `MetClient` against a local axum server standing in for api.met.no.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use chrono::{TimeZone, Utc};
use forecast_cache::{
    error::FetchError, upstream::FORECAST_PATH, Coordinates, ForecastGateway, MetClient,
    Revalidation,
};
use tokio::net::TcpListener;

const USER_AGENT: &str = "forecast-cache-tests/1.0 tests@example.com";
const LAST_MODIFIED: &str = "Sat, 01 Jun 2024 10:32:11 GMT";
const FIXTURE: &str = include_str!("fixtures/met_response.json");

// == Mock Upstream ==

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    headers: Vec<(header::HeaderName, &'static str)>,
    body: &'static str,
    delay: Option<Duration>,
}

impl Reply {
    fn status(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: "",
            delay: None,
        }
    }

    fn forecast(status: StatusCode) -> Self {
        Self {
            status,
            headers: vec![
                (header::LAST_MODIFIED, LAST_MODIFIED),
                (header::EXPIRES, "Sat, 01 Jun 2024 11:05:00 GMT"),
            ],
            body: FIXTURE,
            delay: None,
        }
    }
}

#[derive(Debug, Clone)]
struct Seen {
    query: HashMap<String, String>,
    user_agent: Option<String>,
    if_modified_since: Option<String>,
}

#[derive(Clone)]
struct Upstream {
    reply: Reply,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Upstream {
    fn requests(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

async fn forecast_route(
    State(upstream): State<Upstream>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    upstream.seen.lock().unwrap().push(Seen {
        query,
        user_agent: header_value(header::USER_AGENT),
        if_modified_since: header_value(header::IF_MODIFIED_SINCE),
    });

    let reply = upstream.reply;
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    let mut response = Response::builder().status(reply.status);
    for (name, value) in reply.headers {
        response = response.header(name, value);
    }
    response.body(Body::from(reply.body)).unwrap()
}

async fn spawn_upstream(reply: Reply) -> (MetClient, Upstream) {
    let upstream = Upstream {
        reply,
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route(FORECAST_PATH, get(forecast_route))
        .with_state(upstream.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = MetClient::new(
        format!("http://{}", addr),
        USER_AGENT,
        Duration::from_millis(500),
    )
    .unwrap();
    (client, upstream)
}

fn oslo() -> Coordinates {
    Coordinates::new(59.911, 10.750)
}

// == Fetch Tests ==

#[tokio::test]
async fn test_fetch_parses_body_and_headers() {
    let (client, _) = spawn_upstream(Reply::forecast(StatusCode::OK)).await;

    let forecast = client.fetch(&oslo()).await.unwrap();

    assert_eq!(
        forecast.updated_at(),
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 32, 11).unwrap()
    );
    assert_eq!(forecast.last_modified(), Some(LAST_MODIFIED));
    assert_eq!(
        forecast.expires_at(),
        Some(Utc.with_ymd_and_hms(2024, 6, 1, 11, 5, 0).unwrap())
    );
    assert_eq!(forecast.series().len(), 3);
    assert_eq!(forecast.series()[0].wind_speed, Some(3.1));
    assert_eq!(forecast.series()[0].air_temperature, Some(17.4));
}

#[tokio::test]
async fn test_fetch_sends_identity_and_rounded_coordinates() {
    let (client, upstream) = spawn_upstream(Reply::forecast(StatusCode::OK)).await;

    client.fetch(&oslo()).await.unwrap();

    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].user_agent.as_deref(), Some(USER_AGENT));
    assert_eq!(requests[0].if_modified_since, None);
    assert_eq!(requests[0].query["lat"], "59.91");
    assert_eq!(requests[0].query["lon"], "10.75");
}

#[tokio::test]
async fn test_fetch_accepts_non_authoritative_reply() {
    let (client, _) = spawn_upstream(Reply::forecast(StatusCode::NON_AUTHORITATIVE_INFORMATION)).await;

    let forecast = client.fetch(&oslo()).await.unwrap();
    assert_eq!(forecast.series().len(), 3);
}

#[tokio::test]
async fn test_fetch_throttled() {
    let (client, _) = spawn_upstream(Reply::status(StatusCode::TOO_MANY_REQUESTS)).await;

    assert_eq!(client.fetch(&oslo()).await, Err(FetchError::Throttled));
}

#[tokio::test]
async fn test_fetch_unexpected_status() {
    let (client, _) = spawn_upstream(Reply::status(StatusCode::INTERNAL_SERVER_ERROR)).await;

    assert_eq!(
        client.fetch(&oslo()).await,
        Err(FetchError::UnexpectedStatus(500))
    );
}

#[tokio::test]
async fn test_fetch_not_modified_without_token_is_unexpected() {
    let (client, _) = spawn_upstream(Reply::status(StatusCode::NOT_MODIFIED)).await;

    assert_eq!(
        client.fetch(&oslo()).await,
        Err(FetchError::UnexpectedStatus(304))
    );
}

#[tokio::test]
async fn test_fetch_empty_body_is_invalid_payload() {
    let (client, _) = spawn_upstream(Reply::status(StatusCode::OK)).await;

    assert!(matches!(
        client.fetch(&oslo()).await,
        Err(FetchError::PayloadInvalid(_))
    ));
}

#[tokio::test]
async fn test_fetch_malformed_expires_is_ignored() {
    let reply = Reply {
        headers: vec![(header::EXPIRES, "0")],
        ..Reply::forecast(StatusCode::OK)
    };
    let (client, _) = spawn_upstream(reply).await;

    let forecast = client.fetch(&oslo()).await.unwrap();
    assert_eq!(forecast.expires_at(), None);
    assert_eq!(forecast.last_modified(), None);
}

#[tokio::test]
async fn test_fetch_timeout_is_transport_failure() {
    let reply = Reply {
        delay: Some(Duration::from_secs(3)),
        ..Reply::forecast(StatusCode::OK)
    };
    let (client, _) = spawn_upstream(reply).await;

    assert!(matches!(
        client.fetch(&oslo()).await,
        Err(FetchError::Transport(_))
    ));
}

#[tokio::test]
async fn test_fetch_connection_refused_is_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = MetClient::new(format!("http://{}", addr), USER_AGENT, Duration::from_secs(1)).unwrap();

    assert!(matches!(
        client.fetch(&oslo()).await,
        Err(FetchError::Transport(_))
    ));
}

// == Conditional Fetch Tests ==

#[tokio::test]
async fn test_conditional_fetch_not_modified() {
    let (client, upstream) = spawn_upstream(Reply::status(StatusCode::NOT_MODIFIED)).await;

    let outcome = client.conditional_fetch(&oslo(), Some(LAST_MODIFIED)).await;

    assert_eq!(outcome, Revalidation::Unchanged);
    assert_eq!(
        upstream.requests()[0].if_modified_since.as_deref(),
        Some(LAST_MODIFIED)
    );
}

#[tokio::test]
async fn test_conditional_fetch_updated() {
    let (client, _) = spawn_upstream(Reply::forecast(StatusCode::OK)).await;

    let outcome = client.conditional_fetch(&oslo(), Some("Fri, 31 May 2024 09:00:00 GMT")).await;

    match outcome {
        Revalidation::Updated(forecast) => assert_eq!(forecast.last_modified(), Some(LAST_MODIFIED)),
        other => panic!("expected an updated forecast, got {:?}", other),
    }
}

#[tokio::test]
async fn test_conditional_fetch_without_token_sends_no_condition() {
    let (client, upstream) = spawn_upstream(Reply::forecast(StatusCode::OK)).await;

    let outcome = client.conditional_fetch(&oslo(), None).await;

    assert!(matches!(outcome, Revalidation::Updated(_)));
    assert_eq!(upstream.requests()[0].if_modified_since, None);
}

#[tokio::test]
async fn test_conditional_fetch_throttled() {
    let (client, _) = spawn_upstream(Reply::status(StatusCode::TOO_MANY_REQUESTS)).await;

    assert_eq!(
        client.conditional_fetch(&oslo(), Some(LAST_MODIFIED)).await,
        Revalidation::Failed(FetchError::Throttled)
    );
}
