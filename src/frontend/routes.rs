//! Frontend route definitions.

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{health, index, not_found, track_requests, FrontendState};

/// Create the frontend router.
pub fn create_router(state: FrontendState) -> Router {
    Router::new()
        .route("/", get(index).fallback(not_found))
        .route("/health", get(health).fallback(not_found))
        .fallback(not_found)
        .layer(middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
