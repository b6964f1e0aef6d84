//! Demo HTTP services for exercising observability tooling.
//!
//! Two independent services live here:
//!
//! - a JSON **backend** with a handful of diagnostic routes and two in-memory
//!   counters (requests seen, errors seen);
//! - a **frontend** that serves one static page whose script calls the
//!   backend from the browser.
//!
//! ```text
//! browser ──GET /──────────────▶ frontend (:3000)
//!    │
//!    └──fetch /api/health ─────▶ backend  (:3001)
//!       fetch /api/metadata
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`backend`]: Backend routes, counters and demo data
//! - [`frontend`]: Frontend page and health probe
//! - [`metrics`]: Prometheus metric names and recorders
//! - [`probe`]: Command-line smoke check of a running backend
//! - [`utils`]: Timestamps and shutdown signal handling

pub mod backend;
pub mod config;
pub mod error;
pub mod frontend;
pub mod metrics;
pub mod probe;
pub mod utils;

pub use config::{BackendConfig, FrontendConfig};
pub use error::{Result, ServiceError};
