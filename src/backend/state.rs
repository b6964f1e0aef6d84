//! Backend state shared with handlers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::config::BackendConfig;

#[derive(Debug, Default)]
struct Counters {
    requests: AtomicU64,
    errors: AtomicU64,
}

/// Application state shared with handlers.
///
/// Cloning is cheap; every clone observes the same counters.
#[derive(Debug, Clone)]
pub struct BackendState {
    counters: Arc<Counters>,
    config: Arc<BackendConfig>,
    started_at: Instant,
}

impl BackendState {
    /// Create new state with zeroed counters.
    pub fn new(config: BackendConfig) -> Self {
        Self {
            counters: Arc::new(Counters::default()),
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    /// Count one inbound request. Returns the new total.
    pub fn record_request(&self) -> u64 {
        self.counters.requests.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Add `amount` to the error counter. Returns the new total.
    pub fn record_errors(&self, amount: u64) -> u64 {
        self.counters.errors.fetch_add(amount, Ordering::SeqCst) + amount
    }

    /// Requests seen since start.
    pub fn request_count(&self) -> u64 {
        self.counters.requests.load(Ordering::SeqCst)
    }

    /// Errors seen since start.
    pub fn error_count(&self) -> u64 {
        self.counters.errors.load(Ordering::SeqCst)
    }

    /// Seconds since the state was created.
    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }

    /// Loaded configuration.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }
}

impl Default for BackendState {
    fn default() -> Self {
        Self::new(BackendConfig::default())
    }
}
