//! Handler for the narration console.

use axum::extract::State;
use axum::Json;

use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/logs
///
/// The bounded execution log, oldest line first.
pub async fn list_logs(State(state): State<AppState>) -> Json<DataResponse<Vec<String>>> {
    Json(DataResponse {
        data: state.log.snapshot(),
    })
}
