//! Health handlers: the service's own liveness plus a read-through of every
//! external service's health check.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use sweeparr_clients::{DownloadClient as _, LibraryManager as _, ServiceHealth};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Display name used for the download client in health reports.
const DOWNLOAD_CLIENT_NAME: &str = "qBittorrent";

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Configured environment tag (`unknown` when the config is unreadable).
    pub environment: String,
}

/// GET /health -- returns service liveness and the configured environment.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let environment = match state.store.get().await {
        Ok(config) => config.environment.to_string(),
        Err(_) => "unknown".to_string(),
    };

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        environment,
    })
}

/// One external service's health, keyed by display name.
#[derive(Serialize)]
pub struct ServiceStatus {
    pub name: String,
    #[serde(flatten)]
    pub health: ServiceHealth,
}

/// GET /api/v1/health/services
///
/// Per-service health: the download client plus every configured library
/// manager. Disabled libraries report `disabled` without being contacted.
pub async fn services(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ServiceStatus>>>> {
    let config = state.store.get().await?;

    let mut statuses = Vec::with_capacity(config.libraries.len() + 1);

    let download_health = match state.factory.download_client(&config.download_client) {
        Ok(client) => client.health_check().await,
        Err(e) => ServiceHealth::error(e.to_string()),
    };
    statuses.push(ServiceStatus {
        name: DOWNLOAD_CLIENT_NAME.to_string(),
        health: download_health,
    });

    for library in &config.libraries {
        let health = if !library.enabled {
            ServiceHealth::disabled()
        } else {
            match state.factory.library_manager(library) {
                Ok(manager) => manager.health_check().await,
                Err(e) => ServiceHealth::error(e.to_string()),
            }
        };
        statuses.push(ServiceStatus {
            name: library.name.clone(),
            health,
        });
    }

    Ok(Json(DataResponse { data: statuses }))
}
