//! Candidate collection.
//!
//! Lists completed transfers from the download client once, fetches managed
//! records from every enabled library manager concurrently, and attaches
//! linkage to each transfer. A single unreachable library manager becomes a
//! per-library error marker and the run proceeds on the rest; the run only
//! fails when the download client is unreachable or every configured
//! library manager failed.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use sweeparr_core::config::{Config, LibraryConfig};
use sweeparr_core::item::{Item, LibraryLink};
use sweeparr_core::narration::ExecutionLog;
use sweeparr_clients::{ClientError, ClientFactory, DownloadClient, LibraryManager};

/// The run cannot proceed: no source produced any data.
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("Download client unreachable: {0}")]
    DownloadClient(ClientError),

    #[error("All configured library managers failed")]
    AllLibrariesFailed,
}

/// One configured library's collection status for this run.
#[derive(Debug)]
pub struct LibrarySource {
    pub config: LibraryConfig,
    /// Set when this library's records could not be fetched. Its items are
    /// not evaluated this run.
    pub error: Option<String>,
}

/// Everything a run evaluates, rebuilt fresh on every invocation.
#[derive(Debug)]
pub struct Collection {
    /// All completed transfers with linkage attached, sorted by display
    /// name (case-insensitive) for deterministic presentation.
    pub items: Vec<Item>,
    /// Total managed set size, the denominator for the safety gate's
    /// percentage ceiling.
    pub total_transfers: usize,
    /// Enabled libraries in configuration order.
    pub libraries: Vec<LibrarySource>,
}

/// Gather transfers and linkage for one run.
///
/// The download client is built by the caller (the controller keeps it for
/// the executing phase); library-manager clients are built here, per run,
/// from the config snapshot.
pub async fn collect(
    download_client: &dyn DownloadClient,
    factory: &dyn ClientFactory,
    config: &Config,
    log: &ExecutionLog,
) -> Result<Collection, CollectionError> {
    let transfers = match download_client.list_transfers().await {
        Ok(transfers) => transfers,
        Err(e) => return Err(CollectionError::DownloadClient(e)),
    };
    let total_transfers = transfers.len();
    log.push(format!("{total_transfers} completed transfers found"));

    // Fetch records from every enabled library concurrently; each fetch is
    // independent and bounded by the client timeout.
    let enabled: Vec<&LibraryConfig> = config.enabled_libraries().collect();
    let fetches = enabled.iter().map(|library| {
        let manager = factory.library_manager(library);
        async move {
            match manager {
                Ok(manager) => fetch_records(manager).await,
                Err(e) => Err(e),
            }
        }
    });
    let results = join_all(fetches).await;

    let mut links_by_hash: HashMap<String, Vec<LibraryLink>> = HashMap::new();
    let mut libraries = Vec::with_capacity(enabled.len());
    let mut failures = 0usize;

    for (library, result) in enabled.iter().zip(results) {
        match result {
            Ok(records) => {
                for record in &records {
                    links_by_hash
                        .entry(record.download_id.to_ascii_lowercase())
                        .or_default()
                        .push(LibraryLink {
                            library: library.name.clone(),
                            imported: record.imported,
                        });
                }
                log.push(format!(
                    "[{}] {} managed records fetched",
                    library.name,
                    records.len()
                ));
                libraries.push(LibrarySource {
                    config: (*library).clone(),
                    error: None,
                });
            }
            Err(e) => {
                failures += 1;
                tracing::warn!(library = %library.name, error = %e, "Library collection failed");
                log.push(format!("[{}] collection failed: {e}", library.name));
                libraries.push(LibrarySource {
                    config: (*library).clone(),
                    error: Some(e.to_string()),
                });
            }
        }
    }

    if !enabled.is_empty() && failures == enabled.len() {
        return Err(CollectionError::AllLibrariesFailed);
    }

    let mut items: Vec<Item> = transfers
        .into_iter()
        .map(|t| {
            let links = links_by_hash.remove(&t.hash).unwrap_or_default();
            Item {
                hash: t.hash,
                name: t.name,
                category: t.category,
                size_bytes: t.size_bytes,
                completed_at: t.completed_at,
                links,
            }
        })
        .collect();
    items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    Ok(Collection {
        items,
        total_transfers,
        libraries,
    })
}

async fn fetch_records(
    manager: Arc<dyn LibraryManager>,
) -> Result<Vec<sweeparr_clients::ManagedRecord>, ClientError> {
    manager.list_managed_records().await
}
