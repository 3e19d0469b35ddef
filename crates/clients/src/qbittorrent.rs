//! qBittorrent WebUI API client.
//!
//! Speaks the v2 WebUI API: form-based login (the session cookie is held by
//! the reqwest cookie store), `torrents/info` for listing, and
//! `torrents/delete` for the destructive call. Only transfers that have
//! finished downloading are surfaced.

use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{ClientError, DownloadClient, ServiceHealth, Transfer};

/// Client for one qBittorrent instance.
pub struct QbitClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    /// Whether a login has succeeded on this client's cookie session.
    logged_in: Mutex<bool>,
}

/// Subset of the `torrents/info` payload this system reads.
#[derive(Debug, Deserialize)]
struct TorrentInfo {
    hash: String,
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    size: i64,
    #[serde(default)]
    progress: f64,
    /// Unix seconds; zero or negative when the transfer has not completed.
    #[serde(default)]
    completion_on: i64,
}

impl TorrentInfo {
    fn into_transfer(self) -> Transfer {
        Transfer {
            hash: self.hash.to_ascii_lowercase(),
            name: self.name,
            category: if self.category.is_empty() {
                None
            } else {
                Some(self.category)
            },
            size_bytes: self.size,
            completed_at: (self.completion_on > 0)
                .then(|| chrono::DateTime::from_timestamp(self.completion_on, 0))
                .flatten(),
        }
    }
}

impl QbitClient {
    /// Create a client for the given WebUI.
    ///
    /// * `http` - a reqwest client with a cookie store (the WebUI session
    ///   is cookie-based) and a request timeout.
    pub fn new(http: reqwest::Client, base_url: String, username: String, password: String) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            password,
            logged_in: Mutex::new(false),
        }
    }

    /// Log in if this session has not yet. qBittorrent answers 200 with a
    /// literal `Fails.` body on bad credentials, so the body is checked too.
    async fn ensure_session(&self) -> Result<(), ClientError> {
        let mut logged_in = self.logged_in.lock().await;
        if *logged_in {
            return Ok(());
        }

        let response = self
            .http
            .post(format!("{}/api/v2/auth/login", self.base_url))
            .form(&[
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
            ])
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        if body.trim() != "Ok." {
            return Err(ClientError::Auth(format!(
                "qBittorrent rejected login for user '{}'",
                self.username
            )));
        }

        tracing::debug!(url = %self.base_url, "Logged in to qBittorrent");
        *logged_in = true;
        Ok(())
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl DownloadClient for QbitClient {
    /// List fully-downloaded transfers. Incomplete transfers are never
    /// deletion candidates and are filtered here.
    async fn list_transfers(&self) -> Result<Vec<Transfer>, ClientError> {
        self.ensure_session().await?;

        let response = self
            .http
            .get(format!("{}/api/v2/torrents/info", self.base_url))
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        let torrents: Vec<TorrentInfo> = response.json().await?;

        let transfers: Vec<Transfer> = torrents
            .into_iter()
            .filter(|t| t.progress >= 1.0)
            .map(TorrentInfo::into_transfer)
            .collect();

        tracing::debug!(count = transfers.len(), "Fetched completed transfers");
        Ok(transfers)
    }

    /// Delete one transfer and its data. The per-item granularity keeps the
    /// run's failure accounting exact.
    async fn delete(&self, hash: &str) -> Result<(), ClientError> {
        self.ensure_session().await?;

        let response = self
            .http
            .post(format!("{}/api/v2/torrents/delete", self.base_url))
            .form(&[("hashes", hash), ("deleteFiles", "true")])
            .send()
            .await?;
        Self::ensure_success(response).await?;

        tracing::info!(hash, "Deleted transfer");
        Ok(())
    }

    async fn health_check(&self) -> ServiceHealth {
        if let Err(e) = self.ensure_session().await {
            return ServiceHealth::error(e.to_string());
        }

        let result = async {
            let response = self
                .http
                .get(format!("{}/api/v2/app/version", self.base_url))
                .send()
                .await?;
            let response = Self::ensure_success(response).await?;
            Ok::<_, ClientError>(response.text().await?)
        }
        .await;

        match result {
            Ok(version) => ServiceHealth::ok(Some(version.trim().to_string())),
            Err(e) => ServiceHealth::error(e.to_string()),
        }
    }
}
