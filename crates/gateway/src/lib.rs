//! HTTP Gateway Library
//!
//! This crate provides the HTTP surface. It receives the shared database
//! handle from its caller and never opens or closes connections itself.

pub mod handlers;
pub mod routes;
pub mod shutdown;
pub mod state;

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use common::{AppError, AppResult, ServiceConfig};
use user_store_lib::ConnectionProbe;

use crate::routes::create_router;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;

/// Bind the configured address and serve until Ctrl+C or SIGTERM.
pub async fn run_server(probe: Arc<dyn ConnectionProbe>, config: ServiceConfig) -> AppResult<()> {
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("{} listening on http://{}", config.service_name, addr);

    let state = AppState::new(probe, config);
    serve(listener, state, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state).layer(TraceLayer::new_for_http());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    info!("Server shutdown complete");
    Ok(())
}
