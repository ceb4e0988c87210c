//! Tick runner: main loop that re-evaluates on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use herdbell_core::config::SchedulerConfig;
use herdbell_core::traits::Clock;
use herdbell_store::{Checkpoint, CheckpointFile, SettingsRepository};

use crate::tick::{ReevaluationTick, TickReport};

/// Where and what to checkpoint after each tick.
#[derive(Debug, Clone)]
struct CheckpointTarget {
    file: CheckpointFile,
    settings: Arc<SettingsRepository>,
}

/// Drives [`ReevaluationTick`] until cancelled. Ticks never overlap.
#[derive(Debug)]
pub struct TickRunner {
    tick: ReevaluationTick,
    config: SchedulerConfig,
    clock: Arc<dyn Clock>,
    checkpoint: Option<CheckpointTarget>,
    running: Mutex<()>,
}

impl TickRunner {
    /// Create a runner.
    pub fn new(tick: ReevaluationTick, config: SchedulerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            tick,
            config,
            clock,
            checkpoint: None,
            running: Mutex::new(()),
        }
    }

    /// Write a checkpoint of both repositories after every tick.
    pub fn with_checkpoint(mut self, file: CheckpointFile, settings: Arc<SettingsRepository>) -> Self {
        self.checkpoint = Some(CheckpointTarget { file, settings });
        self
    }

    /// Run one tick unless another one is in progress, then checkpoint.
    pub async fn tick_once(&self, cancel: &CancellationToken) -> Option<TickReport> {
        let Ok(_guard) = self.running.try_lock() else {
            debug!("Previous tick still running; skipping");
            return None;
        };

        let report = match self.tick.run(cancel).await {
            Ok(report) => Some(report),
            Err(e) => {
                error!(error = %e, "Tick failed");
                None
            }
        };
        self.save_checkpoint().await;
        report
    }

    /// Write a checkpoint now, if one is configured. Failures are logged.
    pub async fn save_checkpoint(&self) {
        let Some(target) = &self.checkpoint else {
            return;
        };
        let checkpoint = Checkpoint::capture(
            self.tick.notifications(),
            &target.settings,
            self.tick.dispatcher().pending(),
            self.clock.now(),
        )
        .await;
        if let Err(e) = target.file.save(&checkpoint).await {
            warn!(path = %target.file.path().display(), error = %e, "Checkpoint failed");
        }
    }

    /// Start the runner; returns when `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            interval_seconds = self.config.interval_seconds,
            run_on_start = self.config.run_on_start,
            "Tick runner started"
        );

        if self.config.run_on_start {
            self.tick_once(&cancel).await;
        }

        let period = Duration::from_secs(self.config.interval_seconds);
        let mut interval = time::interval_at(time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Tick runner received shutdown signal");
                    break;
                }
                _ = interval.tick() => {
                    self.tick_once(&cancel).await;
                }
            }
        }

        info!("Tick runner shut down complete");
    }
}
