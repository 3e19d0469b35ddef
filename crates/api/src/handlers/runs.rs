//! Handlers for the `/runs` resource: the simulate/execute surface.
//!
//! Both handlers return the run's [`RunResult`] verbatim; a gate denial or
//! total collection failure arrives as HTTP 200 with `success = false` so
//! the operator console can show the reason. Only configuration errors map
//! to error status codes -- those mean the run never started.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use sweeparr_core::run::{Confirmation, RunMode, RunResult};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/runs/simulate
///
/// Trigger a dry run and return its report. Never performs a destructive
/// call, so it needs no confirmation and bypasses the safety gate.
pub async fn simulate(State(state): State<AppState>) -> AppResult<Json<DataResponse<RunResult>>> {
    let result = state.controller.run(RunMode::Simulate, None).await?;
    Ok(Json(DataResponse { data: result }))
}

/// Request body for the execute endpoint.
#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    /// Must be `true`; asserted by the caller immediately before the
    /// request, never cached.
    #[serde(default)]
    pub confirm: bool,
}

/// POST /api/v1/runs/execute
///
/// Trigger a destructive run. The confirmation token is minted here, per
/// request, from the explicit `confirm` flag -- a missing or false flag is
/// reported exactly like a gate denial.
pub async fn execute(
    State(state): State<AppState>,
    Json(body): Json<ExecuteRequest>,
) -> AppResult<Json<DataResponse<RunResult>>> {
    let confirmation = body.confirm.then(Confirmation::affirm);
    let result = state.controller.run(RunMode::Execute, confirmation).await?;
    Ok(Json(DataResponse { data: result }))
}
