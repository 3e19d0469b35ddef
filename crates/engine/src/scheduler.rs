//! Periodic simulation runs.
//!
//! Keeps the dry-run report fresh for the dashboard without operator
//! interaction. Only ever runs Simulate: a destructive run requires a
//! confirmation minted by the caller at the moment of confirmation, which
//! an unattended loop by definition cannot provide.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::controller::WorkflowController;
use sweeparr_core::run::RunMode;

/// Long-lived task that triggers a simulate run on a fixed interval.
pub struct SimulationScheduler {
    controller: Arc<WorkflowController>,
    interval: Duration,
}

impl SimulationScheduler {
    pub fn new(controller: Arc<WorkflowController>, interval: Duration) -> Self {
        Self {
            controller,
            interval,
        }
    }

    /// Run the scheduler loop until the cancellation token is triggered.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Simulation scheduler started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        // The first tick fires immediately; skip it so startup is quiet.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Simulation scheduler stopping");
                    break;
                }
                _ = ticker.tick() => {
                    match self.controller.run(RunMode::Simulate, None).await {
                        Ok(result) => {
                            tracing::info!(
                                run_id = %result.run_id,
                                would_delete = result.would_delete_count(),
                                success = result.success,
                                "Scheduled simulation completed"
                            );
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Scheduled simulation failed");
                        }
                    }
                }
            }
        }
    }
}
