//! Connection probe used by components that only need liveness.

use async_trait::async_trait;

use common::{AppError, AppResult};

use super::Database;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Liveness view of the shared database handle, injected where a component
/// must not depend on the concrete connection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ConnectionProbe: Send + Sync {
    /// Round-trip a trivial query
    async fn ping(&self) -> AppResult<()>;

    /// Backend name (`mysql`, `sqlite`, ...)
    fn backend(&self) -> &'static str;
}

#[async_trait]
impl ConnectionProbe for Database {
    async fn ping(&self) -> AppResult<()> {
        Database::ping(self).await.map_err(AppError::from)
    }

    fn backend(&self) -> &'static str {
        Database::backend(self)
    }
}
