pub mod config;
pub mod health;
pub mod logs;
pub mod runs;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /runs/simulate        GET   trigger a dry run, return the report
/// /runs/execute         POST  trigger a destructive run (requires confirm)
///
/// /health/services      GET   per-service health read-through
///
/// /config               GET   current operator configuration
/// /config               PUT   validate and save configuration
///
/// /logs                 GET   bounded execution log
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/runs", runs::router())
        .nest("/health", health::api_router())
        .nest("/config", config::router())
        .nest("/logs", logs::router())
}
