//! JSON checkpoints of the lifecycle store, settings overrides, and parked
//! hand-offs.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};

use herdbell_core::error::{AppError, ErrorKind};
use herdbell_core::result::AppResult;
use herdbell_entity::notification::Notification;

use crate::repositories::{
    NotificationRepository, PendingDeliveries, PendingDelivery, SettingsRepository, StoredSetting,
};

/// Checkpoint format version.
const FORMAT_VERSION: u32 = 1;

/// Serialized state of every repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Format version.
    pub version: u32,
    /// When the checkpoint was taken.
    pub saved_at: DateTime<Utc>,
    /// Every notification record.
    #[serde(default)]
    pub notifications: Vec<Notification>,
    /// Every settings override.
    #[serde(default)]
    pub settings: Vec<StoredSetting>,
    /// Hand-offs waiting for a quiet window to end.
    #[serde(default)]
    pub pending: Vec<PendingDelivery>,
}

impl Checkpoint {
    /// Snapshot the current contents of every repository.
    pub async fn capture(
        notifications: &NotificationRepository,
        settings: &SettingsRepository,
        pending: &PendingDeliveries,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            version: FORMAT_VERSION,
            saved_at: now,
            notifications: notifications.export().await,
            settings: settings.export(),
            pending: pending.export(),
        }
    }

    /// Replace the contents of every repository with this checkpoint.
    pub async fn restore(
        self,
        notifications: &NotificationRepository,
        settings: &SettingsRepository,
        pending: &PendingDeliveries,
    ) {
        notifications.import(self.notifications).await;
        settings.import(self.settings);
        pending.import(self.pending);
    }
}

/// A checkpoint file on local disk.
#[derive(Debug, Clone)]
pub struct CheckpointFile {
    path: PathBuf,
}

impl CheckpointFile {
    /// Point at `path`; nothing is read until [`CheckpointFile::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The checkpoint path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the checkpoint. A missing file yields `None`.
    pub async fn load(&self) -> AppResult<Option<Checkpoint>> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No checkpoint found");
                return Ok(None);
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read checkpoint: {}", self.path.display()),
                    e,
                ));
            }
        };

        let checkpoint: Checkpoint = serde_json::from_slice(&raw)?;
        if checkpoint.version != FORMAT_VERSION {
            return Err(AppError::storage(format!(
                "Unsupported checkpoint version {} in {}",
                checkpoint.version,
                self.path.display()
            )));
        }

        info!(
            path = %self.path.display(),
            notifications = checkpoint.notifications.len(),
            settings = checkpoint.settings.len(),
            pending = checkpoint.pending.len(),
            "Loaded checkpoint"
        );
        Ok(Some(checkpoint))
    }

    /// Write the checkpoint to a temp file next to the target, then rename
    /// it over the target.
    pub async fn save(&self, checkpoint: &Checkpoint) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create checkpoint directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        let body = serde_json::to_vec_pretty(checkpoint)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &body).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write checkpoint: {}", tmp.display()),
                e,
            )
        })?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to move checkpoint into place: {}", self.path.display()),
                e,
            )
        })?;

        debug!(
            path = %self.path.display(),
            notifications = checkpoint.notifications.len(),
            "Checkpoint saved"
        );
        Ok(())
    }
}
