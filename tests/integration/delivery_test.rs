//! Integration tests for hand-off, quiet hours, and the delivery worker.

mod helpers;

use std::sync::Arc;

use chrono::Duration;
use tokio_util::sync::CancellationToken;

use herdbell_core::config::DeliveryConfig;
use herdbell_dispatch::DeliveryWorker;
use herdbell_entity::herd::HerdSnapshot;
use herdbell_entity::notification::{
    DeliveryChannel, NotificationCategory, QuietHours, SettingUpdate,
};
use herdbell_entity::user::UserRole;

use helpers::{RecordingTransport, TestApp};

fn low_feed() -> HerdSnapshot {
    let mut snapshot = HerdSnapshot::empty(helpers::as_of());
    snapshot.feed.push(helpers::feed("silage", "Silage", 5.0, 20.0));
    snapshot
}

fn kolkata(defer: bool) -> DeliveryConfig {
    DeliveryConfig {
        timezone: "Asia/Kolkata".to_string(),
        defer_during_quiet_hours: defer,
        ..DeliveryConfig::default()
    }
}

/// Admin in Kolkata; 09:00 UTC is 14:30 local, inside 14:00-15:00.
fn quiet_afternoon(defer: bool) -> TestApp {
    let app = TestApp::with_delivery(low_feed(), UserRole::Admin, kolkata(defer));
    app.settings_service()
        .update_setting(
            &app.ctx(),
            NotificationCategory::Alerts,
            &SettingUpdate {
                quiet_hours: Some(Some(QuietHours::parse("14:00", "15:00").unwrap())),
                ..SettingUpdate::default()
            },
        )
        .unwrap();
    app
}

#[tokio::test]
async fn test_outside_quiet_hours_every_channel_is_handed_off() {
    let mut app = TestApp::new(low_feed(), UserRole::Admin);
    let report = app.tick().await;
    assert_eq!(report.handed_off, 2);
    assert_eq!(report.deferred, 0);

    let channels: Vec<DeliveryChannel> = app.drain().into_iter().map(|r| r.channel).collect();
    assert_eq!(channels, vec![DeliveryChannel::InApp, DeliveryChannel::Email]);
}

#[tokio::test]
async fn test_quiet_hours_defer_external_until_window_ends() {
    let mut app = quiet_afternoon(true);

    let first = app.tick().await;
    assert_eq!(first.handed_off, 1);
    assert_eq!(first.deferred, 1);
    let channels: Vec<DeliveryChannel> = app.drain().into_iter().map(|r| r.channel).collect();
    assert_eq!(channels, vec![DeliveryChannel::InApp]);

    app.clock.advance(Duration::minutes(20));
    let still_quiet = app.tick().await;
    assert_eq!(still_quiet.handed_off, 0);
    assert!(app.drain().is_empty());

    app.clock.advance(Duration::minutes(11));
    let after = app.tick().await;
    assert_eq!(after.handed_off, 1);
    let channels: Vec<DeliveryChannel> = app.drain().into_iter().map(|r| r.channel).collect();
    assert_eq!(channels, vec![DeliveryChannel::Email]);

    // Delivered once, never again.
    app.tick().await;
    assert!(app.drain().is_empty());
    assert!(app.dispatcher.pending().is_empty());
}

#[tokio::test]
async fn test_deferred_hand_off_survives_restart() {
    let mut app = quiet_afternoon(true);
    assert_eq!(app.tick().await.deferred, 1);
    app.drain();

    let mut resumed = app.restart(kolkata(true)).await;
    assert_eq!(resumed.dispatcher.pending().len(), 1);

    resumed.clock.advance(Duration::minutes(31));
    let report = resumed.tick().await;
    assert_eq!(report.created, 0);
    assert_eq!(report.handed_off, 1);
    let channels: Vec<DeliveryChannel> = resumed.drain().into_iter().map(|r| r.channel).collect();
    assert_eq!(channels, vec![DeliveryChannel::Email]);
    assert!(resumed.dispatcher.pending().is_empty());
}

#[tokio::test]
async fn test_deferred_hand_off_dropped_once_read() {
    let mut app = quiet_afternoon(true);
    app.tick().await;
    app.drain();

    let service = app.notification_service();
    let id = service.list_unread(&app.ctx()).await[0].id;
    service.mark_as_read(&app.ctx(), id).await.unwrap();

    app.clock.advance(Duration::hours(1));
    let report = app.tick().await;
    assert_eq!(report.deferred_dropped, 1);
    assert!(app.drain().is_empty());
}

#[tokio::test]
async fn test_quiet_hours_without_deferral_drop_external() {
    let mut app = quiet_afternoon(false);
    let report = app.tick().await;
    assert_eq!(report.handed_off, 1);
    assert_eq!(report.deferred, 0);
    assert!(app.dispatcher.pending().is_empty());

    app.clock.advance(Duration::hours(1));
    app.tick().await;
    let channels: Vec<DeliveryChannel> = app.drain().into_iter().map(|r| r.channel).collect();
    assert_eq!(channels, vec![DeliveryChannel::InApp]);
}

#[tokio::test]
async fn test_full_queue_drops_without_blocking() {
    let mut app = TestApp::with_delivery(
        low_feed(),
        UserRole::Admin,
        DeliveryConfig {
            queue_capacity: 1,
            ..DeliveryConfig::default()
        },
    );
    let report = app.tick().await;
    assert_eq!(report.handed_off, 1);
    assert_eq!(report.dropped, 1);
    assert_eq!(app.drain().len(), 1);
}

#[tokio::test]
async fn test_worker_delivers_queued_hand_offs_on_shutdown() {
    let mut app = TestApp::new(low_feed(), UserRole::Admin);
    app.tick().await;

    let transport = Arc::new(RecordingTransport::default());
    let receiver = app.receiver.take().unwrap();
    let cancel = CancellationToken::new();
    let worker = tokio::spawn(DeliveryWorker::new(receiver, transport.clone()).run(cancel.clone()));

    cancel.cancel();
    worker.await.unwrap();

    let id = app.notifications.list_unread(app.user).await[0].id;
    assert_eq!(
        transport.delivered(),
        vec![(id, DeliveryChannel::InApp), (id, DeliveryChannel::Email)]
    );
}
