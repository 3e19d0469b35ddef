//! Route definitions for the `/runs` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::runs;
use crate::state::AppState;

/// Routes mounted at `/runs`.
///
/// ```text
/// GET  /simulate  -> dry run, returns the would-delete report
/// POST /execute   -> destructive run, body must assert confirm
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/simulate", get(runs::simulate))
        .route("/execute", post(runs::execute))
}
