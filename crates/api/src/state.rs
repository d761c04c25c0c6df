use std::sync::Arc;

use cinestudio_engine::Engine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: cinestudio_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The orchestration engine (sequencer, lifecycle, ledger, coordinator).
    pub engine: Engine,
    /// Centralized event bus for publishing studio events.
    pub event_bus: Arc<cinestudio_events::EventBus>,
}
