//! HTTP handlers.

mod health_handler;

pub use health_handler::{health_check, health_routes, HealthResponse, ServiceHealth, ServiceStatus};
