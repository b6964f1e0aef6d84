//! Server-side smoke probe of a running backend.
//!
//! Performs the same calls the frontend page makes from the browser, plus
//! `/api/status`, so a deployment can be checked from a shell.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::Result;

/// Paths requested by [`probe_backend`], in order.
pub const PROBE_PATHS: [&str; 3] = ["/api/health", "/api/metadata", "/api/status"];

/// Outcome of one probed path.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    /// Requested path.
    pub path: &'static str,
    /// HTTP status, if a response arrived.
    pub status: Option<u16>,
    /// Response body, or the transport error.
    pub body: String,
}

impl ProbeResult {
    /// Whether a 2xx response arrived.
    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(code) if (200..300).contains(&code))
    }
}

/// Build the HTTP client used for probing.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Request every path in [`PROBE_PATHS`] against `base_url`.
///
/// Transport failures are captured in the result rather than returned, so
/// one unreachable endpoint does not hide the others.
pub async fn probe_backend(client: &reqwest::Client, base_url: &str) -> Vec<ProbeResult> {
    let base = base_url.trim_end_matches('/');
    let mut results = Vec::with_capacity(PROBE_PATHS.len());

    for path in PROBE_PATHS {
        let url = format!("{}{}", base, path);
        debug!("Probing {}", url);

        let result = match client.get(&url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let body = match response.text().await {
                    Ok(text) => text,
                    Err(e) => format!("<unreadable body: {}>", e),
                };
                ProbeResult {
                    path,
                    status: Some(status),
                    body,
                }
            }
            Err(e) => {
                warn!("Probe of {} failed: {}", url, e);
                ProbeResult {
                    path,
                    status: None,
                    body: e.to_string(),
                }
            }
        };

        results.push(result);
    }

    results
}
