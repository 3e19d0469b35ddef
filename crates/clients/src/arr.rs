//! Radarr/Sonarr v3 API client.
//!
//! Both managers expose the same surface for our purposes: `history`
//! records carrying the download hash (`downloadId`) with an event type
//! that tells us whether the import finished, and `system/status` for the
//! health check. One client type covers any number of configured instances.

use std::collections::HashMap;

use serde::Deserialize;

use crate::{ClientError, LibraryManager, ManagedRecord, ServiceHealth};

/// History event emitted once a download has been fully imported.
const EVENT_IMPORTED: &str = "downloadFolderImported";

/// Client for one Radarr/Sonarr-style instance.
pub struct ArrClient {
    name: String,
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Paged response envelope of the `history` endpoint.
#[derive(Debug, Deserialize)]
struct HistoryPage {
    #[serde(default)]
    records: Vec<HistoryRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryRecord {
    #[serde(default)]
    download_id: Option<String>,
    #[serde(default)]
    source_title: Option<String>,
    event_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SystemStatus {
    #[serde(default)]
    version: Option<String>,
}

impl ArrClient {
    pub fn new(name: String, http: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            name,
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
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

    /// Collapse history records into one [`ManagedRecord`] per download
    /// hash. A download counts as imported once any of its events says so.
    fn collapse(records: Vec<HistoryRecord>) -> Vec<ManagedRecord> {
        let mut by_hash: HashMap<String, ManagedRecord> = HashMap::new();
        for record in records {
            let Some(download_id) = record.download_id.filter(|id| !id.is_empty()) else {
                continue;
            };
            let imported = record.event_type == EVENT_IMPORTED;
            let entry = by_hash
                .entry(download_id.to_ascii_lowercase())
                .or_insert_with(|| ManagedRecord {
                    download_id,
                    title: record.source_title.unwrap_or_default(),
                    imported: false,
                });
            entry.imported |= imported;
        }
        by_hash.into_values().collect()
    }
}

#[async_trait::async_trait]
impl LibraryManager for ArrClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_managed_records(&self) -> Result<Vec<ManagedRecord>, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/v3/history", self.base_url))
            .query(&[
                ("page", "1"),
                ("pageSize", "1000"),
                ("sortKey", "date"),
                ("sortDirection", "descending"),
            ])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        let page: HistoryPage = response.json().await?;

        let records = Self::collapse(page.records);
        tracing::debug!(
            library = %self.name,
            count = records.len(),
            "Fetched managed records"
        );
        Ok(records)
    }

    async fn health_check(&self) -> ServiceHealth {
        let result = async {
            let response = self
                .http
                .get(format!("{}/api/v3/system/status", self.base_url))
                .header("X-Api-Key", &self.api_key)
                .send()
                .await?;
            let response = Self::ensure_success(response).await?;
            Ok::<_, ClientError>(response.json::<SystemStatus>().await?)
        }
        .await;

        match result {
            Ok(status) => ServiceHealth::ok(status.version),
            Err(e) => ServiceHealth::error(e.to_string()),
        }
    }
}
