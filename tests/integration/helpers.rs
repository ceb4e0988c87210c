//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use herdbell_core::config::{DeliveryConfig, DetectionConfig};
use herdbell_core::error::AppError;
use herdbell_core::result::AppResult;
use herdbell_core::traits::{Clock, ManualClock};
use herdbell_core::types::{NotificationId, UserId};
use herdbell_dispatch::{DeliveryDispatcher, DeliveryRequest, Transport};
use herdbell_entity::herd::{
    BreedingRecord, CalvingRecord, FeedItem, HerdSnapshot, VaccinationRecord,
};
use herdbell_entity::notification::DeliveryChannel;
use herdbell_entity::user::UserRole;
use herdbell_service::{
    NotificationService, RequestContext, SettingsResolver, SettingsService, SnapshotProvider,
    StaticSnapshotProvider, StaticUserDirectory,
};
use herdbell_store::{Checkpoint, NotificationRepository, SettingsRepository};
use herdbell_worker::{ReevaluationTick, TickReport};

/// Snapshot date used by every scenario.
pub fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

/// 09:00 UTC on the snapshot date.
pub fn morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

/// A date `days` away from [`as_of`].
pub fn day(days: i64) -> NaiveDate {
    as_of() + chrono::Duration::days(days)
}

pub fn feed(id: &str, name: &str, current: f64, minimum: f64) -> FeedItem {
    FeedItem {
        id: id.to_string(),
        name: name.to_string(),
        current_stock: current,
        minimum_stock_level: minimum,
        unit: Some("kg".to_string()),
    }
}

pub fn breeding(cow_no: &str, due_in: i64) -> BreedingRecord {
    BreedingRecord {
        cow_id: cow_no.to_lowercase(),
        cow_no: cow_no.to_string(),
        due_date: day(due_in),
    }
}

pub fn calving(cow_no: &str, due_in: i64) -> CalvingRecord {
    CalvingRecord {
        cow_id: cow_no.to_lowercase(),
        cow_no: cow_no.to_string(),
        expected_delivery: day(due_in),
    }
}

pub fn vaccination(cow_no: &str, vaccine: &str, due_in: i64) -> VaccinationRecord {
    VaccinationRecord {
        cow_id: cow_no.to_lowercase(),
        cow_no: cow_no.to_string(),
        vaccine: vaccine.to_string(),
        due_date: day(due_in),
    }
}

/// Transport that remembers every hand-off it receives.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    delivered: Mutex<Vec<(NotificationId, DeliveryChannel)>>,
}

impl RecordingTransport {
    pub fn delivered(&self) -> Vec<(NotificationId, DeliveryChannel)> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn deliver(&self, notification_id: NotificationId, channel: DeliveryChannel) -> AppResult<()> {
        self.delivered.lock().unwrap().push((notification_id, channel));
        Ok(())
    }
}

/// Serves the inner snapshot but fails the vaccination query.
#[derive(Debug)]
pub struct VaccinationOutage(pub Arc<StaticSnapshotProvider>);

#[async_trait]
impl SnapshotProvider for VaccinationOutage {
    async fn as_of(&self) -> AppResult<NaiveDate> {
        self.0.as_of().await
    }
    async fn feed_stock(&self) -> AppResult<Vec<FeedItem>> {
        self.0.feed_stock().await
    }
    async fn pregnancy_checks(&self) -> AppResult<Vec<BreedingRecord>> {
        self.0.pregnancy_checks().await
    }
    async fn vaccinations(&self) -> AppResult<Vec<VaccinationRecord>> {
        Err(AppError::snapshot_unavailable("vaccination register unreachable"))
    }
    async fn expected_deliveries(&self) -> AppResult<Vec<CalvingRecord>> {
        self.0.expected_deliveries().await
    }
    async fn inseminations(&self) -> AppResult<Vec<BreedingRecord>> {
        self.0.inseminations().await
    }
}

/// A fully wired engine for one user, driven by a manual clock.
pub struct TestApp {
    pub user: UserId,
    pub role: UserRole,
    pub clock: Arc<ManualClock>,
    pub snapshots: Arc<StaticSnapshotProvider>,
    pub notifications: Arc<NotificationRepository>,
    pub settings: Arc<SettingsRepository>,
    pub dispatcher: Arc<DeliveryDispatcher>,
    pub tick: ReevaluationTick,
    pub receiver: Option<mpsc::Receiver<DeliveryRequest>>,
}

impl TestApp {
    /// Build an engine serving `snapshot` to a single user with `role`.
    pub fn new(snapshot: HerdSnapshot, role: UserRole) -> Self {
        Self::with_delivery(snapshot, role, DeliveryConfig::default())
    }

    /// Like [`TestApp::new`], with a custom delivery config.
    pub fn with_delivery(snapshot: HerdSnapshot, role: UserRole, delivery: DeliveryConfig) -> Self {
        let snapshots = Arc::new(StaticSnapshotProvider::new(snapshot));
        Self::build(snapshots.clone(), snapshots, UserId::new(), role, delivery, morning())
    }

    /// Like [`TestApp::new`], with a provider wrapping the static snapshot.
    pub fn with_provider(
        snapshot: HerdSnapshot,
        role: UserRole,
        wrap: impl FnOnce(Arc<StaticSnapshotProvider>) -> Arc<dyn SnapshotProvider>,
    ) -> Self {
        let snapshots = Arc::new(StaticSnapshotProvider::new(snapshot));
        let provider = wrap(Arc::clone(&snapshots));
        Self::build(snapshots, provider, UserId::new(), role, DeliveryConfig::default(), morning())
    }

    /// A fresh engine for the same user and herd, resumed from a checkpoint
    /// of this one at the current clock time.
    pub async fn restart(&self, delivery: DeliveryConfig) -> Self {
        let checkpoint = Checkpoint::capture(
            &self.notifications,
            &self.settings,
            self.dispatcher.pending(),
            self.clock.now(),
        )
        .await;
        let resumed = Self::build(
            self.snapshots.clone(),
            self.snapshots.clone(),
            self.user,
            self.role,
            delivery,
            self.clock.now(),
        );
        checkpoint
            .restore(&resumed.notifications, &resumed.settings, resumed.dispatcher.pending())
            .await;
        resumed
    }

    fn build(
        snapshots: Arc<StaticSnapshotProvider>,
        provider: Arc<dyn SnapshotProvider>,
        user: UserId,
        role: UserRole,
        delivery: DeliveryConfig,
        start: DateTime<Utc>,
    ) -> Self {
        let clock = Arc::new(ManualClock::new(start));
        let notifications = Arc::new(NotificationRepository::new());
        let settings = Arc::new(SettingsRepository::new());

        let (tx, rx) = mpsc::channel(delivery.queue_capacity);
        let dispatcher = Arc::new(
            DeliveryDispatcher::new(
                &delivery,
                tx,
                SettingsResolver::new(Arc::clone(&settings)),
                Arc::clone(&notifications),
                clock.clone(),
            )
            .expect("Failed to build dispatcher"),
        );
        let tick = ReevaluationTick::new(
            DetectionConfig::default(),
            provider,
            Arc::new(StaticUserDirectory::new([(user, role)])),
            Arc::clone(&notifications),
            Arc::clone(&dispatcher),
            clock.clone(),
        );

        Self {
            user,
            role,
            clock,
            snapshots,
            notifications,
            settings,
            dispatcher,
            tick,
            receiver: Some(rx),
        }
    }

    /// Run one tick to completion.
    pub async fn tick(&self) -> TickReport {
        self.tick
            .run(&CancellationToken::new())
            .await
            .expect("Tick failed")
    }

    pub fn ctx(&self) -> RequestContext {
        RequestContext::new(self.user, self.role)
    }

    pub fn notification_service(&self) -> NotificationService {
        NotificationService::new(Arc::clone(&self.notifications), self.clock.clone(), 30)
    }

    pub fn settings_service(&self) -> SettingsService {
        SettingsService::new(Arc::clone(&self.settings))
    }

    /// Every queued hand-off so far, in order.
    pub fn drain(&mut self) -> Vec<DeliveryRequest> {
        let mut requests = Vec::new();
        if let Some(rx) = self.receiver.as_mut() {
            while let Ok(request) = rx.try_recv() {
                requests.push(request);
            }
        }
        requests
    }
}
