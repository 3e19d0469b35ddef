//! Shared scaffolding for API integration tests.
//!
//! Builds the full application router -- the exact middleware stack
//! production uses -- on top of in-memory fakes for the download client,
//! library managers, and configuration store, so tests exercise the HTTP
//! surface without any external service.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use sweeparr_api::config::ServerConfig;
use sweeparr_api::router::build_app_router;
use sweeparr_api::state::AppState;
use sweeparr_core::config::{
    Config, ConfigError, ConfigStore, DownloadClientConfig, Environment, LibraryConfig,
};
use sweeparr_core::narration::ExecutionLog;
use sweeparr_clients::{
    ClientError, ClientFactory, DownloadClient, LibraryManager, ManagedRecord, ServiceHealth,
    Transfer,
};
use sweeparr_engine::WorkflowController;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        config_path: "./config/config.json".into(),
        simulate_interval_secs: 0,
    }
}

// ---- fakes ---------------------------------------------------------------

#[derive(Default)]
pub struct FakeDownloadClient {
    pub transfers: Vec<Transfer>,
    pub fail_listing: bool,
    pub deleted: Mutex<Vec<String>>,
}

impl FakeDownloadClient {
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl DownloadClient for FakeDownloadClient {
    async fn list_transfers(&self) -> Result<Vec<Transfer>, ClientError> {
        if self.fail_listing {
            return Err(ClientError::Auth("listing failed".into()));
        }
        Ok(self.transfers.clone())
    }

    async fn delete(&self, hash: &str) -> Result<(), ClientError> {
        self.deleted.lock().unwrap().push(hash.to_string());
        Ok(())
    }

    async fn health_check(&self) -> ServiceHealth {
        ServiceHealth::ok(Some("4.6.0".into()))
    }
}

pub struct FakeLibraryManager {
    pub name: String,
    pub records: Vec<ManagedRecord>,
}

#[async_trait]
impl LibraryManager for FakeLibraryManager {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_managed_records(&self) -> Result<Vec<ManagedRecord>, ClientError> {
        Ok(self.records.clone())
    }

    async fn health_check(&self) -> ServiceHealth {
        ServiceHealth::ok(Some("5.1.3".into()))
    }
}

pub struct FakeFactory {
    pub download: Arc<FakeDownloadClient>,
    pub managers: Vec<Arc<FakeLibraryManager>>,
}

impl ClientFactory for FakeFactory {
    fn download_client(
        &self,
        _config: &DownloadClientConfig,
    ) -> Result<Arc<dyn DownloadClient>, ClientError> {
        Ok(self.download.clone())
    }

    fn library_manager(
        &self,
        config: &LibraryConfig,
    ) -> Result<Arc<dyn LibraryManager>, ClientError> {
        self.managers
            .iter()
            .find(|m| m.name == config.name)
            .cloned()
            .map(|m| m as Arc<dyn LibraryManager>)
            .ok_or_else(|| ClientError::Auth(format!("no fake for '{}'", config.name)))
    }
}

pub struct MemoryStore {
    config: Mutex<Config>,
}

impl MemoryStore {
    pub fn with(config: Config) -> Arc<Self> {
        Arc::new(Self {
            config: Mutex::new(config),
        })
    }

    pub fn current(&self) -> Config {
        self.config.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get(&self) -> Result<Config, ConfigError> {
        Ok(self.config.lock().unwrap().clone())
    }

    async fn set(&self, config: &Config) -> Result<(), ConfigError> {
        *self.config.lock().unwrap() = config.clone();
        Ok(())
    }
}

// ---- fixtures ------------------------------------------------------------

pub fn transfer(hash: &str, name: &str, days_ago: i64, category: &str) -> Transfer {
    Transfer {
        hash: hash.into(),
        name: name.into(),
        category: Some(category.into()),
        size_bytes: 1_000,
        completed_at: Some(Utc::now() - Duration::days(days_ago)),
    }
}

pub fn record(hash: &str, imported: bool) -> ManagedRecord {
    ManagedRecord {
        download_id: hash.to_ascii_uppercase(),
        title: hash.into(),
        imported,
    }
}

pub fn library(name: &str, category: &str) -> LibraryConfig {
    LibraryConfig {
        name: name.into(),
        enabled: true,
        url: "http://localhost:7878".into(),
        api_key: "key".into(),
        category: Some(category.into()),
        min_seed_days: 30,
    }
}

/// An executable config: production environment, dry-run off, 50% ceiling.
pub fn executable_config(libraries: Vec<LibraryConfig>) -> Config {
    Config {
        dry_run: false,
        environment: Environment::Production,
        max_delete_percent: Some(50.0),
        download_client: DownloadClientConfig {
            url: "http://localhost:8080".into(),
            username: String::new(),
            password: String::new(),
        },
        libraries,
    }
}

/// Ten completed transfers, two of which are old enough and imported.
pub fn reference_download() -> Arc<FakeDownloadClient> {
    let mut transfers = vec![
        transfer("aaa", "Alpha.2023", 45, "movies"),
        transfer("bbb", "Bravo.2024", 60, "movies"),
    ];
    for i in 0..8 {
        transfers.push(transfer(&format!("x{i}"), &format!("Recent.{i}"), 5, "movies"));
    }
    Arc::new(FakeDownloadClient {
        transfers,
        ..Default::default()
    })
}

pub fn reference_manager() -> Arc<FakeLibraryManager> {
    Arc::new(FakeLibraryManager {
        name: "Radarr".into(),
        records: vec![record("aaa", true), record("bbb", true), record("x0", true)],
    })
}

/// Build the full application router with all middleware layers, backed by
/// the given fakes. Mirrors the router construction in `main.rs`.
pub fn build_test_app(
    store: Arc<MemoryStore>,
    download: Arc<FakeDownloadClient>,
    managers: Vec<Arc<FakeLibraryManager>>,
) -> Router {
    let config = test_config();
    let factory: Arc<dyn ClientFactory> = Arc::new(FakeFactory { download, managers });
    let store: Arc<dyn ConfigStore> = store;
    let log = Arc::new(ExecutionLog::default());
    let controller = Arc::new(WorkflowController::new(
        Arc::clone(&store),
        Arc::clone(&factory),
        Arc::clone(&log),
    ));

    let state = AppState {
        controller,
        store,
        factory,
        log,
        config: Arc::new(config.clone()),
    };

    build_app_router(state, &config)
}

// ---- request helpers -----------------------------------------------------

pub async fn get(app: &Router, path: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn post_json(app: &Router, path: &str, body: serde_json::Value) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn put_json(app: &Router, path: &str, body: serde_json::Value) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a 200 response and return its JSON body.
pub async fn ok_json(response: Response) -> serde_json::Value {
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}
