use std::sync::Arc;

use sweeparr_core::config::ConfigStore;
use sweeparr_core::narration::ExecutionLog;
use sweeparr_clients::ClientFactory;
use sweeparr_engine::WorkflowController;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The workflow controller; owns run serialization.
    pub controller: Arc<WorkflowController>,
    /// Operator configuration store (read by handlers, written by the
    /// settings surface).
    pub store: Arc<dyn ConfigStore>,
    /// Builds download/library clients for the health read-through.
    pub factory: Arc<dyn ClientFactory>,
    /// Bounded narration log exposed on the console surface.
    pub log: Arc<ExecutionLog>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
