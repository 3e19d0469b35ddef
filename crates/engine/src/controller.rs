//! The workflow controller.
//!
//! Orchestrates one run through its states:
//!
//! ```text
//! Idle -> Collecting -> Evaluating -> (Simulating | Gating -> Executing)
//!      -> Completed | Failed
//! ```
//!
//! Runs on one controller are serialized by an async mutex -- overlapping
//! execute runs against the same library could double-delete. The config
//! snapshot is read once at run start and never re-read mid-run, so a
//! concurrent settings save cannot change safety thresholds under a run in
//! flight.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use sweeparr_core::config::{ConfigError, ConfigStore};
use sweeparr_core::gate::{self, GateDecision};
use sweeparr_core::item::Item;
use sweeparr_core::narration::ExecutionLog;
use sweeparr_core::policy;
use sweeparr_core::run::{Confirmation, Disposition, ItemOutcome, LibraryOutcome, RunMode, RunResult};
use sweeparr_clients::{ClientFactory, DownloadClient};
use uuid::Uuid;

use crate::collector::{self, Collection};

/// Orchestrates simulate and execute runs. The only component allowed to
/// call [`DownloadClient::delete`].
pub struct WorkflowController {
    store: Arc<dyn ConfigStore>,
    factory: Arc<dyn ClientFactory>,
    log: Arc<ExecutionLog>,
    /// Serializes runs: at most one in flight per controller.
    run_guard: tokio::sync::Mutex<()>,
}

impl WorkflowController {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        factory: Arc<dyn ClientFactory>,
        log: Arc<ExecutionLog>,
    ) -> Self {
        Self {
            store,
            factory,
            log,
            run_guard: tokio::sync::Mutex::new(()),
        }
    }

    /// Perform one run and return its immutable result.
    ///
    /// `confirmation` is required for [`RunMode::Execute`]; its absence is
    /// treated exactly like a gate denial. A [`ConfigError`] means the run
    /// never started; every other failure is reported inside the returned
    /// [`RunResult`].
    pub async fn run(
        &self,
        mode: RunMode,
        confirmation: Option<Confirmation>,
    ) -> Result<RunResult, ConfigError> {
        let _guard = self.run_guard.lock().await;

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        let config = self.store.get().await?;
        config.ensure_valid()?;

        tracing::info!(run_id = %run_id, mode = %mode, "Run started");
        self.log.push(format!("{mode} run started"));

        if mode == RunMode::Execute && confirmation.is_none() {
            let reason = "execute requested without confirmation".to_string();
            self.log.push(format!("execute denied: {reason}"));
            tracing::warn!(run_id = %run_id, "Execute requested without confirmation");
            return Ok(RunResult::failed(run_id, mode, started_at, reason));
        }

        // --- Collecting ---
        let download_client = match self.factory.download_client(&config.download_client) {
            Ok(client) => client,
            Err(e) => {
                let reason = format!("Download client unreachable: {e}");
                self.log.push(format!("run failed: {reason}"));
                return Ok(RunResult::failed(run_id, mode, started_at, reason));
            }
        };
        let collection =
            match collector::collect(&*download_client, &*self.factory, &config, &self.log).await {
                Ok(collection) => collection,
                Err(e) => {
                    tracing::error!(run_id = %run_id, error = %e, "Collection failed");
                    self.log.push(format!("run failed: {e}"));
                    return Ok(RunResult::failed(run_id, mode, started_at, e.to_string()));
                }
            };

        // --- Evaluating ---
        let eligible = self.evaluate(&collection, started_at);

        match mode {
            RunMode::Simulate => {
                // --- Simulating: report only, no gate, no mutation. ---
                let libraries = summarize(&collection, &eligible, |_| Disposition::WouldDelete);
                let result = RunResult::completed(run_id, mode, started_at, libraries);
                self.log.push(format!(
                    "simulate completed: {} transfers would be deleted",
                    result.would_delete_count()
                ));
                tracing::info!(run_id = %run_id, would_delete = result.would_delete_count(), "Simulate run completed");
                Ok(result)
            }
            RunMode::Execute => {
                // --- Gating ---
                let candidates = distinct_candidates(&eligible);
                match gate::authorize(candidates, collection.total_transfers, &config) {
                    GateDecision::Denied(denial) => {
                        self.log.push(format!("execute denied: {denial}"));
                        tracing::warn!(run_id = %run_id, reason = %denial, "Safety gate denied execute");
                        Ok(RunResult::failed(run_id, mode, started_at, denial.to_string()))
                    }
                    GateDecision::Authorized => {
                        self.log.push(format!(
                            "safety gate authorized deletion of {candidates} of {} managed items",
                            collection.total_transfers
                        ));
                        let result = self
                            .execute(run_id, started_at, &collection, &eligible, &*download_client)
                            .await;
                        Ok(result)
                    }
                }
            }
        }
    }

    /// Evaluate every item against every healthy library, in configuration
    /// order. Returns the eligible items per library, preserving the
    /// collection's name ordering. Exclusions of items the library actually
    /// manages are narrated; foreign items are skipped silently.
    fn evaluate(
        &self,
        collection: &Collection,
        now: sweeparr_core::types::Timestamp,
    ) -> Vec<Vec<Item>> {
        collection
            .libraries
            .iter()
            .map(|source| {
                if source.error.is_some() {
                    return Vec::new();
                }
                let mut eligible = Vec::new();
                for item in &collection.items {
                    let verdict = policy::evaluate(item, &source.config, now);
                    if verdict.eligible {
                        eligible.push(item.clone());
                    } else if item.link(&source.config.name).is_some() {
                        // Managed by this library but excluded by a later rule.
                        if let Some(reason) = verdict.reasons.last() {
                            self.log.push(format!(
                                "[{}] skipping '{}': {reason}",
                                source.config.name, item.name
                            ));
                        }
                    }
                }
                self.log.push(format!(
                    "[{}] {} of {} completed transfers eligible",
                    source.config.name,
                    eligible.len(),
                    collection.total_transfers
                ));
                eligible
            })
            .collect()
    }

    /// The executing phase: delete eligible items one at a time, library by
    /// library. A failed deletion is recorded and the run continues; the
    /// run always reaches `Completed` once every item has been attempted.
    async fn execute(
        &self,
        run_id: Uuid,
        started_at: sweeparr_core::types::Timestamp,
        collection: &Collection,
        eligible: &[Vec<Item>],
        download_client: &dyn DownloadClient,
    ) -> RunResult {
        let mut handled: HashSet<String> = HashSet::new();
        let mut libraries = Vec::with_capacity(collection.libraries.len());

        for (source, items) in collection.libraries.iter().zip(eligible) {
            let library = source.config.name.clone();
            if let Some(error) = &source.error {
                libraries.push(LibraryOutcome {
                    library,
                    items: Vec::new(),
                    error: Some(error.clone()),
                });
                continue;
            }

            let mut outcomes = Vec::with_capacity(items.len());
            for item in items {
                // The same transfer can be eligible through two libraries;
                // it must only be deleted once per run.
                let disposition = if !handled.insert(item.hash.clone()) {
                    self.log.push(format!(
                        "[{library}] '{}' already deleted earlier in this run",
                        item.name
                    ));
                    Disposition::Skipped {
                        error: "already deleted earlier in this run".into(),
                    }
                } else {
                    match download_client.delete(&item.hash).await {
                        Ok(()) => {
                            self.log.push(format!("[{library}] deleted '{}'", item.name));
                            Disposition::Deleted
                        }
                        Err(e) => {
                            tracing::warn!(
                                run_id = %run_id,
                                library = %library,
                                hash = %item.hash,
                                error = %e,
                                "Item deletion failed"
                            );
                            self.log.push(format!(
                                "[{library}] delete failed for '{}': {e}",
                                item.name
                            ));
                            Disposition::Skipped {
                                error: e.to_string(),
                            }
                        }
                    }
                };
                outcomes.push(ItemOutcome {
                    hash: item.hash.clone(),
                    name: item.name.clone(),
                    size_bytes: item.size_bytes,
                    disposition,
                });
            }
            libraries.push(LibraryOutcome {
                library,
                items: outcomes,
                error: None,
            });
        }

        let result = RunResult::completed(run_id, RunMode::Execute, started_at, libraries);
        let skipped = result
            .libraries
            .iter()
            .flat_map(|l| &l.items)
            .filter(|i| matches!(i.disposition, Disposition::Skipped { .. }))
            .count();
        self.log.push(format!(
            "execute completed: {} deleted, {skipped} skipped",
            result.deleted_count
        ));
        tracing::info!(
            run_id = %run_id,
            deleted = result.deleted_count,
            skipped,
            "Execute run completed"
        );
        result
    }
}

/// Build per-library summaries from the eligible sets.
fn summarize(
    collection: &Collection,
    eligible: &[Vec<Item>],
    disposition: impl Fn(&Item) -> Disposition,
) -> Vec<LibraryOutcome> {
    collection
        .libraries
        .iter()
        .zip(eligible)
        .map(|(source, items)| LibraryOutcome {
            library: source.config.name.clone(),
            items: items
                .iter()
                .map(|item| ItemOutcome {
                    hash: item.hash.clone(),
                    name: item.name.clone(),
                    size_bytes: item.size_bytes,
                    disposition: disposition(item),
                })
                .collect(),
            error: source.error.clone(),
        })
        .collect()
}

/// Distinct candidate count across libraries, the numerator for the gate's
/// percentage check.
fn distinct_candidates(eligible: &[Vec<Item>]) -> usize {
    eligible
        .iter()
        .flatten()
        .map(|item| item.hash.as_str())
        .collect::<HashSet<_>>()
        .len()
}
