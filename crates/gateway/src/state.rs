//! Application state for dependency injection.

use std::sync::Arc;

use common::ServiceConfig;
use user_store_lib::ConnectionProbe;

/// Application state shared across handlers.
///
/// The database arrives here by injection; handlers never reach for a
/// global connection.
#[derive(Clone)]
pub struct AppState {
    pub probe: Arc<dyn ConnectionProbe>,
    pub config: ServiceConfig,
}

impl AppState {
    /// Create new app state.
    pub fn new(probe: Arc<dyn ConnectionProbe>, config: ServiceConfig) -> Self {
        Self { probe, config }
    }
}
