use std::sync::Arc;

use crate::config::ServerConfig;
use crate::scripting::gateway::ScriptGateway;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// The shared graph store handle.
    pub store: grax_db::GraphStore,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Script execution gateway (engine lifecycle, bindings, dispatch).
    pub gateway: Arc<ScriptGateway>,
}
