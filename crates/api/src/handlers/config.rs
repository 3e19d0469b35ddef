//! Handlers for the operator configuration surface.

use axum::extract::State;
use axum::Json;
use sweeparr_core::config::Config;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/config
///
/// The current operator configuration (defaults when no file exists yet).
pub async fn get_config(State(state): State<AppState>) -> AppResult<Json<DataResponse<Config>>> {
    let config = state.store.get().await?;
    Ok(Json(DataResponse { data: config }))
}

/// PUT /api/v1/config
///
/// Validate and persist a new configuration. Runs already in flight keep
/// the snapshot they started with; the new settings apply from the next
/// run.
pub async fn put_config(
    State(state): State<AppState>,
    Json(config): Json<Config>,
) -> AppResult<Json<DataResponse<Config>>> {
    config.ensure_valid()?;
    state.store.set(&config).await?;
    Ok(Json(DataResponse { data: config }))
}
