//! Request counting and CORS middleware.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN},
        HeaderName, Method,
    },
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::debug;

use super::state::BackendState;
use super::SERVICE_NAME;
use crate::metrics;

const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

/// Counts every request before routing, matched or not.
pub async fn count_requests(
    State(state): State<BackendState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let total = state.record_request();
    metrics::inc_http_requests(SERVICE_NAME);
    debug!(method = %request.method(), path = %request.uri().path(), total, "request");

    let response = next.run(request).await;

    metrics::record_http_latency(start, SERVICE_NAME);
    response
}

/// Permissive CORS. `OPTIONS` on any path is answered with an empty 200
/// before routing.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, X_REQUESTED_WITH, CONTENT_TYPE, ACCEPT, AUTHORIZATION])
}
