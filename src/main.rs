//! HerdBell Server: livestock notification engine
//!
//! Main entry point that wires all crates together and runs the
//! re-evaluation loop until shutdown.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt};

use herdbell_core::config::AppConfig;
use herdbell_core::error::AppError;
use herdbell_core::traits::{Clock, SystemClock};
use herdbell_dispatch::{DeliveryDispatcher, DeliveryWorker, LogTransport};
use herdbell_service::{JsonSnapshotProvider, SettingsResolver, StaticUserDirectory};
use herdbell_store::{
    CheckpointFile, NotificationRepository, PendingDeliveries, SettingsRepository,
};
use herdbell_worker::{CronScheduler, ReevaluationTick, TickRunner};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("HERDBELL_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    AppConfig::load(&config_path)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting HerdBell v{}", env!("CARGO_PKG_VERSION"));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // ── Step 1: Stores, restored from the last checkpoint ────────
    let notifications = Arc::new(NotificationRepository::new());
    let settings = Arc::new(SettingsRepository::new());
    let pending = PendingDeliveries::new();
    let checkpoint = config.store.checkpoint_path.as_ref().map(CheckpointFile::new);
    if let Some(file) = &checkpoint {
        if let Some(saved) = file.load().await? {
            saved.restore(&notifications, &settings, &pending).await;
        }
    }

    // ── Step 2: Users and herd facts ─────────────────────────────
    let directory = Arc::new(StaticUserDirectory::from_config(&config.users)?);
    if directory.is_empty() {
        tracing::warn!("No users configured; ticks will produce nothing");
    }
    let snapshots = Arc::new(JsonSnapshotProvider::new(&config.snapshot.path));
    tracing::info!(
        users = directory.len(),
        snapshot = %config.snapshot.path,
        "Inputs configured"
    );

    // ── Step 3: Delivery queue and worker ────────────────────────
    let shutdown = CancellationToken::new();
    let (tx, rx) = mpsc::channel(config.delivery.queue_capacity);
    let dispatcher = Arc::new(
        DeliveryDispatcher::new(
            &config.delivery,
            tx,
            SettingsResolver::new(Arc::clone(&settings)),
            Arc::clone(&notifications),
            Arc::clone(&clock),
        )?
        .with_pending(pending),
    );
    let delivery_handle = tokio::spawn(
        DeliveryWorker::new(rx, Arc::new(LogTransport)).run(shutdown.clone()),
    );

    // ── Step 4: Re-evaluation tick ───────────────────────────────
    let tick = ReevaluationTick::new(
        config.detection.clone(),
        snapshots,
        directory,
        Arc::clone(&notifications),
        dispatcher,
        Arc::clone(&clock),
    );
    let mut runner = TickRunner::new(tick, config.scheduler.clone(), Arc::clone(&clock));
    if let Some(file) = checkpoint {
        runner = runner.with_checkpoint(file, Arc::clone(&settings));
    }
    let runner = Arc::new(runner);

    // ── Step 5: Schedule ─────────────────────────────────────────
    let mut scheduler = None;
    let runner_handle = if !config.scheduler.enabled {
        tracing::info!("Scheduler disabled");
        None
    } else if let Some(expression) = &config.scheduler.cron {
        let cron = CronScheduler::new(Arc::clone(&runner), shutdown.clone()).await?;
        cron.register_tick(expression).await?;
        cron.start().await?;
        if config.scheduler.run_on_start {
            runner.tick_once(&shutdown).await;
        }
        scheduler = Some(cron);
        None
    } else {
        let runner = Arc::clone(&runner);
        let cancel = shutdown.clone();
        Some(tokio::spawn(async move { runner.run(cancel).await }))
    };

    tracing::info!("HerdBell running");

    // ── Step 6: Shutdown ─────────────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping...");
    shutdown.cancel();

    if let Some(mut cron) = scheduler {
        if let Err(e) = cron.shutdown().await {
            tracing::warn!("Scheduler shutdown failed: {}", e);
        }
    }
    if let Some(handle) = runner_handle {
        if let Err(e) = handle.await {
            tracing::warn!("Tick runner task failed: {}", e);
        }
    }
    runner.save_checkpoint().await;

    if let Err(e) = delivery_handle.await {
        tracing::warn!("Delivery worker task failed: {}", e);
    }

    tracing::info!("HerdBell stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
