//! Demo frontend service: one static page plus a liveness probe.

pub mod handlers;
pub mod page;
pub mod routes;

pub use handlers::FrontendState;
pub use routes::create_router;

/// Service name reported in responses and metric labels.
pub const SERVICE_NAME: &str = "frontend";
