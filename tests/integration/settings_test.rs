//! Integration tests for role defaults and settings overrides.

mod helpers;

use std::collections::BTreeSet;

use herdbell_core::error::ErrorKind;
use herdbell_entity::herd::HerdSnapshot;
use herdbell_entity::notification::{
    DeliveryChannel, NotificationCategory, QuietHours, SettingUpdate,
};
use herdbell_entity::user::UserRole;

use helpers::TestApp;

fn low_feed() -> HerdSnapshot {
    let mut snapshot = HerdSnapshot::empty(helpers::as_of());
    snapshot.feed.push(helpers::feed("silage", "Silage", 5.0, 20.0));
    snapshot
}

#[tokio::test]
async fn test_worker_defaults_and_apply_role_defaults() {
    let app = TestApp::new(low_feed(), UserRole::Worker);
    let service = app.settings_service();
    let ctx = app.ctx();

    let effective = service.get_settings(&ctx);
    assert!(!effective[&NotificationCategory::Updates].enabled);
    assert!(effective[&NotificationCategory::Reminders].enabled);

    let applied = service.apply_role_defaults(&ctx, UserRole::from_name("worker"));
    assert_eq!(
        applied[&NotificationCategory::Reminders].channels,
        BTreeSet::from([DeliveryChannel::InApp])
    );
    assert_eq!(app.settings.find_by_user(app.user).len(), 3);
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() {
    let app = TestApp::new(low_feed(), UserRole::Admin);
    let service = app.settings_service();
    let ctx = app.ctx();

    let window = QuietHours::parse("22:00", "06:00").unwrap();
    service
        .update_setting(
            &ctx,
            NotificationCategory::Alerts,
            &SettingUpdate {
                quiet_hours: Some(Some(window)),
                ..SettingUpdate::default()
            },
        )
        .unwrap();

    let updated = service
        .update_setting(
            &ctx,
            NotificationCategory::Alerts,
            &SettingUpdate {
                channels: Some(BTreeSet::from([DeliveryChannel::Whatsapp])),
                ..SettingUpdate::default()
            },
        )
        .unwrap();
    assert!(updated.enabled);
    assert_eq!(updated.quiet_hours, Some(window));
    assert_eq!(updated.channels, BTreeSet::from([DeliveryChannel::Whatsapp]));

    // Other categories still follow the role table.
    let effective = service.get_settings(&ctx);
    assert_eq!(
        effective[&NotificationCategory::Reminders].channels,
        BTreeSet::from([DeliveryChannel::InApp, DeliveryChannel::Email])
    );
}

#[tokio::test]
async fn test_enabling_without_channels_is_rejected() {
    let app = TestApp::new(low_feed(), UserRole::Viewer);
    let service = app.settings_service();
    let ctx = app.ctx();

    let err = service
        .update_setting(
            &ctx,
            NotificationCategory::Alerts,
            &SettingUpdate {
                enabled: Some(true),
                channels: Some(BTreeSet::new()),
                quiet_hours: None,
            },
        )
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidSetting);
    assert!(app.settings.find_by_user(app.user).is_empty());
}

#[tokio::test]
async fn test_unknown_role_gets_viewer_defaults() {
    assert_eq!(UserRole::from_name("accountant"), UserRole::Viewer);

    let mut app = TestApp::new(low_feed(), UserRole::from_name("accountant"));
    let report = app.tick().await;

    // The record exists for the bell even though nothing is handed off.
    assert_eq!(report.created, 1);
    assert_eq!(report.handed_off, 0);
    assert!(app.drain().is_empty());
}

#[tokio::test]
async fn test_override_changes_hand_off_channels() {
    let mut app = TestApp::new(low_feed(), UserRole::Worker);
    app.settings_service()
        .update_setting(
            &app.ctx(),
            NotificationCategory::Alerts,
            &SettingUpdate {
                channels: Some(BTreeSet::from([DeliveryChannel::InApp, DeliveryChannel::Whatsapp])),
                ..SettingUpdate::default()
            },
        )
        .unwrap();

    app.tick().await;
    let channels: Vec<DeliveryChannel> = app.drain().into_iter().map(|r| r.channel).collect();
    assert_eq!(channels, vec![DeliveryChannel::InApp, DeliveryChannel::Whatsapp]);
}
