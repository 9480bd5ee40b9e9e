//! Route configuration.

use axum::Router;

use crate::handlers::health_routes;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check (no auth, no rate limit)
        .nest("/health", health_routes())
        .with_state(state)
}
