//! HTTP API handlers for the backend service.

use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::data::{generate_items, parse_count, DataItem, ERROR_RATE};
use super::state::BackendState;
use super::{ENDPOINTS, SERVICE_NAME};
use crate::metrics;
use crate::utils::iso_timestamp;

/// Version reported by `/api/metadata`.
pub const API_VERSION: &str = "1.0.0";

/// Runtime identity reported as `metrics.node_version`.
pub const RUNTIME_VERSION: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Raw query pairs in arrival order. Never fails to extract.
type QueryPairs = Query<Vec<(String, String)>>;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always "healthy".
    pub status: &'static str,
    /// Always "backend".
    pub service: &'static str,
    pub timestamp: String,
    /// Seconds since start.
    pub uptime: f64,
    pub environment: String,
    pub request_count: u64,
    pub error_count: u64,
}

/// Metadata response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub environment: String,
    /// Telemetry client identifier, verbatim.
    pub app_insights_key: String,
    /// Whether a connection string is present and not the sentinel.
    pub sql_configured: bool,
    pub timestamp: String,
}

/// Status response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Always "operational".
    pub status: &'static str,
    /// Always "backend-api".
    pub service: &'static str,
    pub timestamp: String,
    pub uptime: f64,
    pub request_count: u64,
    pub error_count: u64,
    pub metrics: RuntimeMetrics,
}

/// Runtime block nested in the status response.
#[derive(Debug, Serialize)]
pub struct RuntimeMetrics {
    pub environment: String,
    pub node_version: &'static str,
}

/// Echo response.
#[derive(Debug, Serialize)]
pub struct EchoResponse {
    pub message: &'static str,
    /// Query parameters as received. Repeated keys become arrays.
    pub query: Map<String, Value>,
    pub timestamp: String,
}

/// Generated data response.
#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub items: Vec<DataItem>,
    /// Number of items returned.
    pub count: usize,
    /// Number of items with status "error".
    pub errors: u64,
}

/// Database probe response.
#[derive(Debug, Serialize)]
pub struct DbTestResponse {
    /// Always "db_test".
    pub status: &'static str,
    pub configured: bool,
    pub message: &'static str,
    pub timestamp: String,
}

/// Unmatched route response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundResponse {
    pub error: &'static str,
    pub path: String,
    pub available_endpoints: &'static [&'static str],
}

/// Health check handler - always returns 200.
pub async fn health(State(state): State<BackendState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        timestamp: iso_timestamp(),
        uptime: state.uptime_secs(),
        environment: state.config().environment.clone(),
        request_count: state.request_count(),
        error_count: state.error_count(),
    })
}

/// Metadata handler - reports configuration presence, never secrets beyond
/// the telemetry identifier.
pub async fn metadata(State(state): State<BackendState>) -> impl IntoResponse {
    let config = state.config();

    Json(MetadataResponse {
        service: SERVICE_NAME,
        version: API_VERSION,
        environment: config.environment.clone(),
        app_insights_key: config.client_id.clone(),
        sql_configured: config.sql_configured(),
        timestamp: iso_timestamp(),
    })
}

/// Status handler - counters plus runtime details.
pub async fn status(State(state): State<BackendState>) -> impl IntoResponse {
    Json(StatusResponse {
        status: "operational",
        service: "backend-api",
        timestamp: iso_timestamp(),
        uptime: state.uptime_secs(),
        request_count: state.request_count(),
        error_count: state.error_count(),
        metrics: RuntimeMetrics {
            environment: state.config().environment.clone(),
            node_version: RUNTIME_VERSION,
        },
    })
}

/// Echo handler - returns the query parameters unchanged.
pub async fn echo(Query(pairs): QueryPairs) -> impl IntoResponse {
    Json(EchoResponse {
        message: "Echo response from backend",
        query: query_to_map(pairs),
        timestamp: iso_timestamp(),
    })
}

/// Data handler - generates a random batch and counts its failures.
pub async fn data(State(state): State<BackendState>, Query(pairs): QueryPairs) -> impl IntoResponse {
    let raw_count = pairs
        .iter()
        .find(|(key, _)| key == "count")
        .map(|(_, value)| value.as_str());
    let count = parse_count(raw_count, state.config().data_max_items);

    let batch = generate_items(count, ERROR_RATE, &mut rand::thread_rng());

    if batch.errors > 0 {
        state.record_errors(batch.errors);
        metrics::add_http_errors(SERVICE_NAME, batch.errors);
    }
    metrics::record_data_batch(batch.items.len() as u64, batch.errors);
    debug!(requested = ?raw_count, count, errors = batch.errors, "generated data batch");

    Json(DataResponse {
        count: batch.items.len(),
        errors: batch.errors,
        items: batch.items,
    })
}

/// Database probe handler - inspects configuration only, never connects.
pub async fn db_test(State(state): State<BackendState>) -> impl IntoResponse {
    let configured = state.config().sql_configured();

    Json(DbTestResponse {
        status: "db_test",
        configured,
        message: if configured {
            "Database connection string is configured"
        } else {
            "Database connection string is not configured"
        },
        timestamp: iso_timestamp(),
    })
}

/// Fallback handler - 404 with the list of known routes.
pub async fn not_found(State(state): State<BackendState>, uri: Uri) -> impl IntoResponse {
    state.record_errors(1);
    metrics::add_http_errors(SERVICE_NAME, 1);
    warn!(path = %uri.path(), "route not found");

    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: "Not Found",
            path: uri.path().to_string(),
            available_endpoints: &ENDPOINTS,
        }),
    )
}

fn query_to_map(pairs: Vec<(String, String)>) -> Map<String, Value> {
    let mut map = Map::new();

    for (key, value) in pairs {
        match map.get_mut(&key) {
            Some(Value::Array(values)) => values.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None => {
                map.insert(key, Value::String(value));
            }
        }
    }

    map
}
