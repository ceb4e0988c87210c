//! Cron trigger for the re-evaluation tick.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use herdbell_core::error::AppError;

use crate::runner::TickRunner;

/// Runs the tick on a six-field cron expression
/// (`sec min hour day-of-month month day-of-week`).
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Shared runner; keeps ticks from overlapping
    runner: Arc<TickRunner>,
    /// Passed to every tick
    cancel: CancellationToken,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(runner: Arc<TickRunner>, cancel: CancellationToken) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            runner,
            cancel,
        })
    }

    /// Register the tick under `expression`
    pub async fn register_tick(&self, expression: &str) -> Result<(), AppError> {
        let runner = Arc::clone(&self.runner);
        let cancel = self.cancel.clone();
        let job = CronJob::new_async(expression, move |_uuid, _lock| {
            let runner = Arc::clone(&runner);
            let cancel = cancel.clone();
            Box::pin(async move {
                if cancel.is_cancelled() {
                    return;
                }
                debug!("Cron trigger fired");
                runner.tick_once(&cancel).await;
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid cron expression '{expression}': {e}"))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add tick schedule: {e}")))?;

        info!(expression, "Registered: re-evaluation tick");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        info!("Cron scheduler shut down");
        Ok(())
    }
}
