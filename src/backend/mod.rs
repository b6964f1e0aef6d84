//! Demo backend service.
//!
//! A fixed set of JSON diagnostic routes plus two process-wide counters:
//! requests seen and errors seen (unmatched routes and simulated item
//! failures).

pub mod data;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use data::{DataItem, ItemStatus};
pub use routes::create_router;
pub use state::BackendState;

/// Service name reported in responses and metric labels.
pub const SERVICE_NAME: &str = "backend";

/// Routes listed in 404 responses, in routing order.
pub const ENDPOINTS: [&str; 6] = [
    "/api/health",
    "/api/metadata",
    "/api/status",
    "/api/echo",
    "/api/data",
    "/api/db-test",
];
