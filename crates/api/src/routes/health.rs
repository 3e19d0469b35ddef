//! Route definitions for the health surfaces.

use axum::routing::get;
use axum::Router;

use crate::handlers::health;
use crate::state::AppState;

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health::health_check))
}

/// Routes mounted at `/health` under `/api/v1`.
pub fn api_router() -> Router<AppState> {
    Router::new().route("/services", get(health::services))
}
