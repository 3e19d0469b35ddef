use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sweeparr_api::config::ServerConfig;
use sweeparr_api::router::build_app_router;
use sweeparr_api::state::AppState;
use sweeparr_api::store::FileConfigStore;
use sweeparr_core::config::ConfigStore;
use sweeparr_core::narration::ExecutionLog;
use sweeparr_clients::{ClientFactory, HttpClientFactory};
use sweeparr_engine::scheduler::SimulationScheduler;
use sweeparr_engine::WorkflowController;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sweeparr_api=debug,sweeparr_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let store: Arc<dyn ConfigStore> = Arc::new(FileConfigStore::new(config.config_path.clone()));
    match store.get().await {
        Ok(operator) => {
            tracing::info!(
                dry_run = operator.dry_run,
                environment = %operator.environment,
                libraries = operator.libraries.len(),
                "Operator configuration loaded"
            );
            if operator.dry_run {
                tracing::info!("Dry run is enabled; no deletions will be performed");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Operator configuration unreadable; runs will fail until fixed");
        }
    }

    // --- Engine ---
    let factory: Arc<dyn ClientFactory> = Arc::new(HttpClientFactory::default());
    let log = Arc::new(ExecutionLog::default());
    let controller = Arc::new(WorkflowController::new(
        Arc::clone(&store),
        Arc::clone(&factory),
        Arc::clone(&log),
    ));

    // --- Simulation scheduler (optional) ---
    let scheduler_cancel = tokio_util::sync::CancellationToken::new();
    let scheduler_handle = if config.simulate_interval_secs > 0 {
        let scheduler = SimulationScheduler::new(
            Arc::clone(&controller),
            Duration::from_secs(config.simulate_interval_secs),
        );
        let cancel = scheduler_cancel.clone();
        Some(tokio::spawn(scheduler.run(cancel)))
    } else {
        None
    };

    // --- App state ---
    let state = AppState {
        controller,
        store,
        factory,
        log,
        config: Arc::new(config.clone()),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    scheduler_cancel.cancel();
    if let Some(handle) = scheduler_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        tracing::info!("Simulation scheduler stopped");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
