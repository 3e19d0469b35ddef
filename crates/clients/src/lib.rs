//! Capability interfaces for the external systems sweeparr talks to, plus
//! their HTTP implementations.
//!
//! The engine only ever sees the [`DownloadClient`] and [`LibraryManager`]
//! traits; the concrete clients here speak the qBittorrent WebUI API and
//! the Radarr/Sonarr v3 API over [`reqwest`]. Clients are rebuilt from the
//! config snapshot at the start of every run via the [`ClientFactory`].

pub mod arr;
pub mod error;
pub mod factory;
pub mod qbittorrent;

use async_trait::async_trait;
use serde::Serialize;
use sweeparr_core::types::Timestamp;

pub use error::ClientError;
pub use factory::{ClientFactory, HttpClientFactory};

/// A completed transfer as reported by the download client, before any
/// library linkage is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    /// Content hash, normalized to lowercase.
    pub hash: String,
    pub name: String,
    pub category: Option<String>,
    pub size_bytes: i64,
    pub completed_at: Option<Timestamp>,
}

/// A library-manager record that references a download by hash.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagedRecord {
    /// Download hash as reported by the library manager (case not
    /// normalized; compare case-insensitively).
    pub download_id: String,
    pub title: String,
    /// Whether the library manager reports the download as fully imported.
    pub imported: bool,
}

/// Health of one external service, as surfaced by the status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceHealth {
    pub status: HealthState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Ok,
    Disabled,
    Error,
}

impl ServiceHealth {
    pub fn ok(version: Option<String>) -> Self {
        Self {
            status: HealthState::Ok,
            message: None,
            version,
        }
    }

    pub fn disabled() -> Self {
        Self {
            status: HealthState::Disabled,
            message: None,
            version: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: HealthState::Error,
            message: Some(message.into()),
            version: None,
        }
    }
}

/// The download client capability: list completed transfers, delete one,
/// report health. `delete` is the only destructive operation in the whole
/// system and is invoked solely by the workflow controller.
#[async_trait]
pub trait DownloadClient: Send + Sync {
    async fn list_transfers(&self) -> Result<Vec<Transfer>, ClientError>;
    async fn delete(&self, hash: &str) -> Result<(), ClientError>;
    async fn health_check(&self) -> ServiceHealth;
}

/// One library-manager instance (e.g. a movies or TV library).
#[async_trait]
pub trait LibraryManager: Send + Sync {
    /// Display name, matching the configured library name.
    fn name(&self) -> &str;
    async fn list_managed_records(&self) -> Result<Vec<ManagedRecord>, ClientError>;
    async fn health_check(&self) -> ServiceHealth;
}
