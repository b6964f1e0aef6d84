//! Backend route definitions.

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{data, db_test, echo, health, metadata, not_found, status};
use super::middleware::{count_requests, cors_layer};
use super::state::BackendState;

/// Create the backend router.
///
/// Routes answer GET (and HEAD); any other method on a known path takes the
/// same 404 path as an unknown route. OPTIONS is answered by the CORS layer
/// before routing, inside the request counter.
pub fn create_router(state: BackendState) -> Router {
    Router::new()
        .route("/api/health", get(health).fallback(not_found))
        .route("/api/metadata", get(metadata).fallback(not_found))
        .route("/api/status", get(status).fallback(not_found))
        .route("/api/echo", get(echo).fallback(not_found))
        .route("/api/data", get(data).fallback(not_found))
        .route("/api/db-test", get(db_test).fallback(not_found))
        .fallback(not_found)
        .layer(cors_layer())
        .layer(middleware::from_fn_with_state(state.clone(), count_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
