//! HTTP handlers for the frontend service.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{StatusCode, Uri},
    middleware::Next,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::debug;

use super::page::render_page;
use super::SERVICE_NAME;
use crate::metrics;

/// Frontend state shared with handlers.
#[derive(Debug, Clone)]
pub struct FrontendState {
    /// Cleared once graceful shutdown begins.
    healthy: Arc<AtomicBool>,
    /// Rendered page, built once at startup.
    page: Arc<str>,
}

impl FrontendState {
    /// Create state serving a page that points at `api_url`.
    pub fn new(api_url: &str) -> Self {
        Self {
            healthy: Arc::new(AtomicBool::new(true)),
            page: render_page(api_url).into(),
        }
    }

    /// Set health state.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Check if healthy.
    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    /// The rendered page.
    pub fn page(&self) -> &str {
        &self.page
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "shutting_down".
    pub status: &'static str,
    pub service: &'static str,
}

/// Unmatched route response.
#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    pub error: &'static str,
    pub path: String,
}

/// Health check handler - 200 while serving, 503 once draining.
pub async fn health(State(state): State<FrontendState>) -> impl IntoResponse {
    if state.is_healthy() {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                service: SERVICE_NAME,
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "shutting_down",
                service: SERVICE_NAME,
            }),
        )
    }
}

/// Index handler - the static page.
pub async fn index(State(state): State<FrontendState>) -> Html<String> {
    Html(state.page().to_string())
}

/// Fallback handler.
pub async fn not_found(uri: Uri) -> impl IntoResponse {
    metrics::add_http_errors(SERVICE_NAME, 1);

    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: "Not Found",
            path: uri.path().to_string(),
        }),
    )
}

/// Request metrics middleware.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    metrics::inc_http_requests(SERVICE_NAME);
    debug!(method = %request.method(), path = %request.uri().path(), "request");

    let response = next.run(request).await;

    metrics::record_http_latency(start, SERVICE_NAME);
    response
}
