//! Construction of clients from a config snapshot.
//!
//! Clients are rebuilt at the start of every run so a saved config change
//! (new credentials, added library) takes effect on the next run without a
//! restart. The factory is a trait so the engine can be driven by fakes in
//! tests.

use std::sync::Arc;
use std::time::Duration;

use sweeparr_core::config::{DownloadClientConfig, LibraryConfig};

use crate::arr::ArrClient;
use crate::qbittorrent::QbitClient;
use crate::{ClientError, DownloadClient, LibraryManager};

/// Deadline applied to every outbound request, matching the original's
/// 10-second client timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds capability clients from configuration.
pub trait ClientFactory: Send + Sync {
    fn download_client(
        &self,
        config: &DownloadClientConfig,
    ) -> Result<Arc<dyn DownloadClient>, ClientError>;

    fn library_manager(
        &self,
        config: &LibraryConfig,
    ) -> Result<Arc<dyn LibraryManager>, ClientError>;
}

/// Production factory backed by reqwest.
pub struct HttpClientFactory {
    timeout: Duration,
}

impl Default for HttpClientFactory {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_TIMEOUT)
    }
}

impl HttpClientFactory {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl ClientFactory for HttpClientFactory {
    fn download_client(
        &self,
        config: &DownloadClientConfig,
    ) -> Result<Arc<dyn DownloadClient>, ClientError> {
        // Cookie store carries the WebUI session across calls.
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(self.timeout)
            .build()?;
        Ok(Arc::new(QbitClient::new(
            http,
            config.url.clone(),
            config.username.clone(),
            config.password.clone(),
        )))
    }

    fn library_manager(
        &self,
        config: &LibraryConfig,
    ) -> Result<Arc<dyn LibraryManager>, ClientError> {
        let http = reqwest::Client::builder().timeout(self.timeout).build()?;
        Ok(Arc::new(ArrClient::new(
            config.name.clone(),
            http,
            config.url.clone(),
            config.api_key.clone(),
        )))
    }
}
