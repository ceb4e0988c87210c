//! One-shot re-evaluation against a snapshot file.

use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::output::{self, OutputFormat};
use herdbell_core::error::AppError;
use herdbell_core::traits::ManualClock;
use herdbell_core::types::UserId;
use herdbell_dispatch::{DeliveryDispatcher, DeliveryRequest};
use herdbell_entity::notification::Notification;
use herdbell_entity::user::UserRole;
use herdbell_service::{JsonSnapshotProvider, SettingsResolver, StaticUserDirectory};
use herdbell_store::{
    Checkpoint, CheckpointFile, NotificationRepository, PendingDeliveries, SettingsRepository,
};
use herdbell_worker::ReevaluationTick;

/// Arguments for the evaluate command
#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// Snapshot file (defaults to `snapshot.path` from the configuration)
    #[arg(short, long)]
    pub snapshot: Option<String>,
    /// User ID to evaluate for (a fresh one when omitted)
    #[arg(short, long)]
    pub user: Option<String>,
    /// The user's role
    #[arg(short, long, default_value = "admin")]
    pub role: String,
    /// Evaluation instant, RFC 3339 (defaults to 09:00 UTC on the snapshot date)
    #[arg(long)]
    pub at: Option<String>,
    /// Checkpoint file carried between runs, so repeated runs reconcile
    #[arg(long)]
    pub state: Option<String>,
}

/// One notification as a table row.
#[derive(Debug, Serialize, Tabled)]
pub struct NotificationRow {
    /// Notification ID
    #[tabled(rename = "ID")]
    pub id: String,
    /// Type
    #[tabled(rename = "Type")]
    pub kind: String,
    /// Priority
    #[tabled(rename = "Priority")]
    pub priority: String,
    /// Status
    #[tabled(rename = "Status")]
    pub status: String,
    /// Message
    #[tabled(rename = "Message")]
    pub message: String,
}

impl From<&Notification> for NotificationRow {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.to_string(),
            kind: n.kind.to_string(),
            priority: n.priority.to_string(),
            status: n.status.to_string(),
            message: n.message.clone(),
        }
    }
}

/// Execute the evaluate command
pub async fn execute(args: &EvaluateArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let snapshots = Arc::new(JsonSnapshotProvider::new(
        args.snapshot.clone().unwrap_or_else(|| config.snapshot.path.clone()),
    ));
    let snapshot = snapshots.read().await?;

    let now = match &args.at {
        Some(at) => DateTime::parse_from_rfc3339(at)
            .map_err(|e| AppError::validation(format!("Invalid instant '{at}': {e}")))?
            .with_timezone(&Utc),
        None => snapshot.as_of.and_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()).and_utc(),
    };
    let clock = Arc::new(ManualClock::new(now));

    let user_id = match &args.user {
        Some(raw) => raw
            .parse::<UserId>()
            .map_err(|e| AppError::validation(format!("Invalid user ID '{raw}': {e}")))?,
        None => UserId::new(),
    };
    let role = UserRole::from_name(&args.role);

    let notifications = Arc::new(NotificationRepository::new());
    let settings = Arc::new(SettingsRepository::new());
    let pending = PendingDeliveries::new();
    let state = args.state.as_ref().map(CheckpointFile::new);
    if let Some(file) = &state {
        if let Some(checkpoint) = file.load().await? {
            debug!(path = %file.path().display(), "Restored evaluation state");
            checkpoint.restore(&notifications, &settings, &pending).await;
        }
    }

    let (tx, mut rx) = mpsc::channel::<DeliveryRequest>(config.delivery.queue_capacity);
    let dispatcher = DeliveryDispatcher::new(
        &config.delivery,
        tx,
        SettingsResolver::new(Arc::clone(&settings)),
        Arc::clone(&notifications),
        clock.clone(),
    )?
    .with_pending(pending.clone());
    let tick = ReevaluationTick::new(
        config.detection.clone(),
        snapshots,
        Arc::new(StaticUserDirectory::new([(user_id, role)])),
        Arc::clone(&notifications),
        Arc::new(dispatcher),
        clock.clone(),
    );

    let report = tick.run(&CancellationToken::new()).await?;

    let mut handed_off = 0usize;
    while rx.try_recv().is_ok() {
        handed_off += 1;
    }

    for kind in &report.skipped_detectors {
        output::print_warning(&format!("Detector {kind} skipped: snapshot query failed"));
    }

    let unread = notifications.list_unread(user_id).await;
    let rows: Vec<NotificationRow> = unread.iter().map(NotificationRow::from).collect();
    output::print_list(&rows, format);

    if format == OutputFormat::Table {
        output::print_kv("User", &format!("{user_id} ({role})"));
        output::print_kv("Evaluated at", &now.to_rfc3339());
        output::print_kv(
            "Outcome",
            &format!(
                "{} created, {} escalated, {} refreshed, {} unchanged",
                report.created, report.escalated, report.refreshed, report.unchanged
            ),
        );
        output::print_kv(
            "Delivery",
            &format!("{} handed off, {} deferred", handed_off, report.deferred),
        );
    }

    if let Some(file) = &state {
        let checkpoint = Checkpoint::capture(&notifications, &settings, &pending, now).await;
        file.save(&checkpoint).await?;
        output::print_success(&format!("State saved to '{}'", file.path().display()));
    }

    Ok(())
}
