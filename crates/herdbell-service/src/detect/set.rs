//! Runs every detector against one snapshot provider.

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use herdbell_core::config::DetectionConfig;
use herdbell_core::error::{AppError, ErrorKind};
use herdbell_core::result::AppResult;
use herdbell_entity::notification::NotificationType;

use super::candidate::Candidate;
use super::cattle::{detect_ai_due, detect_delivery_due, detect_pd_due, detect_vaccination_due};
use super::feed::detect_low_stock;
use crate::snapshot::SnapshotProvider;

/// A detector whose snapshot query failed.
#[derive(Debug, Clone)]
pub struct SkippedDetector {
    /// The detector that did not run.
    pub kind: NotificationType,
    /// Why it did not run.
    pub error: AppError,
}

/// Output of one pass over the detector set.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    /// The snapshot date, when it could be read.
    pub as_of: Option<NaiveDate>,
    /// Candidates from every detector that ran.
    pub candidates: Vec<Candidate>,
    /// Detectors skipped because their query failed.
    pub skipped: Vec<SkippedDetector>,
    /// The pass stopped early on cancellation.
    pub cancelled: bool,
}

/// The fixed set of detectors, one per notification type.
#[derive(Debug, Clone)]
pub struct DetectorSet {
    config: DetectionConfig,
}

impl DetectorSet {
    /// Create a detector set with the given look-ahead windows.
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Run every detector, one snapshot query each.
    ///
    /// A failing query skips only its detector. Cancellation is honoured
    /// between detectors.
    pub async fn run(
        &self,
        provider: &dyn SnapshotProvider,
        cancel: &CancellationToken,
    ) -> Detection {
        let mut detection = Detection::default();
        let as_of = provider.as_of().await;
        detection.as_of = as_of.as_ref().ok().copied();

        for kind in NotificationType::ALL {
            if cancel.is_cancelled() {
                debug!(next = %kind, "Detection cancelled");
                detection.cancelled = true;
                break;
            }

            match self.run_one(kind, provider, &as_of).await {
                Ok(mut candidates) => {
                    debug!(kind = %kind, count = candidates.len(), "Detector finished");
                    detection.candidates.append(&mut candidates);
                }
                Err(error) => {
                    let error = if error.kind == ErrorKind::SnapshotUnavailable {
                        error
                    } else {
                        AppError::with_source(
                            ErrorKind::SnapshotUnavailable,
                            format!("Snapshot query for {kind} failed"),
                            error,
                        )
                    };
                    warn!(kind = %kind, error = %error, "Detector skipped");
                    detection.skipped.push(SkippedDetector { kind, error });
                }
            }
        }

        detection
    }

    async fn run_one(
        &self,
        kind: NotificationType,
        provider: &dyn SnapshotProvider,
        as_of: &AppResult<NaiveDate>,
    ) -> AppResult<Vec<Candidate>> {
        let cfg = &self.config;
        match kind {
            NotificationType::LowStock => Ok(detect_low_stock(&provider.feed_stock().await?)),
            NotificationType::PdDue => {
                let as_of = as_of.clone()?;
                let records = provider.pregnancy_checks().await?;
                Ok(detect_pd_due(&records, as_of, cfg.pd_window_days))
            }
            NotificationType::VaccinationDue => {
                let as_of = as_of.clone()?;
                let records = provider.vaccinations().await?;
                Ok(detect_vaccination_due(&records, as_of, cfg.vaccination_window_days))
            }
            NotificationType::DeliveryDue => {
                let as_of = as_of.clone()?;
                let records = provider.expected_deliveries().await?;
                Ok(detect_delivery_due(&records, as_of, cfg.delivery_window_days))
            }
            NotificationType::AiDue => {
                let as_of = as_of.clone()?;
                let records = provider.inseminations().await?;
                Ok(detect_ai_due(&records, as_of, cfg.ai_window_days))
            }
        }
    }
}
