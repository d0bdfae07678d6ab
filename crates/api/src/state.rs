use std::sync::Arc;

use folio_events::EventDispatcher;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: folio_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Dispatcher over the registry built at startup. Shared read-only by
    /// every request's unit of work.
    pub dispatcher: Arc<EventDispatcher>,
    /// Cancelled when the server starts shutting down; in-flight commits
    /// stop draining events once it fires.
    pub shutdown: CancellationToken,
}
