//! Integration tests for the re-evaluation tick.

mod helpers;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use herdbell_core::traits::Clock;
use herdbell_entity::herd::HerdSnapshot;
use herdbell_entity::notification::{
    NotificationCategory, NotificationData, NotificationPriority, NotificationStatus,
    NotificationType,
};
use herdbell_entity::user::UserRole;

use helpers::{TestApp, VaccinationOutage};

#[tokio::test]
async fn test_critical_feed_stock_is_high_priority_alert() {
    let mut snapshot = HerdSnapshot::empty(helpers::as_of());
    snapshot.feed.push(helpers::feed("silage", "Silage", 5.0, 20.0));
    let app = TestApp::new(snapshot, UserRole::Admin);

    let report = app.tick().await;
    assert_eq!(report.candidates, 1);
    assert_eq!(report.created, 1);

    let unread = app.notifications.list_unread(app.user).await;
    assert_eq!(unread.len(), 1);
    let alert = &unread[0];
    assert_eq!(alert.kind, NotificationType::LowStock);
    assert_eq!(alert.category, NotificationCategory::Alerts);
    assert_eq!(alert.priority, NotificationPriority::High);
    assert_eq!(alert.dedupe_key, "low_stock:silage");
    assert!(!alert.is_grouped);
    assert!(alert.message.starts_with("1 feed item"));
}

#[tokio::test]
async fn test_overdue_pd_cows_are_grouped() {
    let mut snapshot = HerdSnapshot::empty(helpers::as_of());
    snapshot.pregnancy_checks.push(helpers::breeding("C14", -2));
    snapshot.pregnancy_checks.push(helpers::breeding("C7", -1));
    let app = TestApp::new(snapshot, UserRole::Admin);

    let report = app.tick().await;
    assert_eq!(report.candidates, 2);
    assert_eq!(report.drafts, 1);

    let unread = app.notifications.list_unread(app.user).await;
    assert_eq!(unread.len(), 1);
    let pd = &unread[0];
    assert_eq!(pd.kind, NotificationType::PdDue);
    assert!(pd.is_grouped);
    assert_eq!(pd.priority, NotificationPriority::High);
    assert_eq!(pd.dedupe_key, "pd_due:c14,c7");
    match &pd.data {
        NotificationData::Cows { cows } => {
            assert_eq!(cows.len(), 2);
            assert!(cows.iter().all(|c| c.overdue));
            assert_eq!(cows[0].cow_no, "C14");
        }
        other => panic!("expected cows, got {other:?}"),
    }
    assert!(pd.message.starts_with("2 cows"));
}

#[tokio::test]
async fn test_repeat_tick_is_idempotent() {
    let mut snapshot = HerdSnapshot::empty(helpers::as_of());
    snapshot.feed.push(helpers::feed("silage", "Silage", 5.0, 20.0));
    snapshot.deliveries.push(helpers::calving("C12", 5));
    let app = TestApp::new(snapshot, UserRole::Admin);

    let first = app.tick().await;
    assert_eq!(first.created, 2);
    let second = app.tick().await;
    assert_eq!(second.created, 0);
    assert_eq!(second.unchanged, 2);
    assert_eq!(app.notifications.export().await.len(), 2);
}

#[tokio::test]
async fn test_growing_set_escalates_in_place() {
    let mut snapshot = HerdSnapshot::empty(helpers::as_of());
    snapshot.deliveries.push(helpers::calving("C12", 6));
    let app = TestApp::new(snapshot.clone(), UserRole::Admin);

    app.tick().await;
    let before = app.notifications.list_unread(app.user).await;
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].priority, NotificationPriority::Medium);

    snapshot.deliveries.push(helpers::calving("C3", 1));
    app.snapshots.replace(snapshot).await;
    let report = app.tick().await;
    assert_eq!(report.escalated, 1);
    assert_eq!(report.created, 0);

    let after = app.notifications.get(app.user, before[0].id).await.unwrap();
    assert_eq!(after.data.affected_count(), 2);
    assert_eq!(after.priority, NotificationPriority::High);
    assert_eq!(after.dedupe_key, "delivery_due:c12,c3");
    assert!(after.version > before[0].version);
}

#[tokio::test]
async fn test_shrinking_set_gets_its_own_record() {
    let mut snapshot = HerdSnapshot::empty(helpers::as_of());
    snapshot.feed.push(helpers::feed("silage", "Silage", 5.0, 20.0));
    snapshot.feed.push(helpers::feed("hay", "Hay", 30.0, 40.0));
    let app = TestApp::new(snapshot.clone(), UserRole::Admin);
    app.tick().await;
    let before = app.notifications.list_unread(app.user).await;

    snapshot.feed.truncate(1);
    app.snapshots.replace(snapshot).await;
    let report = app.tick().await;
    assert_eq!(report.created, 1);

    let after = app.notifications.get(app.user, before[0].id).await.unwrap();
    assert_eq!(after, before[0]);
    let unread = app.notifications.list_unread(app.user).await;
    assert_eq!(unread.len(), 2);
    assert!(unread.iter().any(|n| n.dedupe_key == "low_stock:silage"));
}

#[tokio::test]
async fn test_changed_members_create_new_record_after_read() {
    let mut snapshot = HerdSnapshot::empty(helpers::as_of());
    snapshot.deliveries.push(helpers::calving("C12", 6));
    snapshot.deliveries.push(helpers::calving("C3", 6));
    let mut app = TestApp::new(snapshot, UserRole::Admin);
    app.tick().await;
    app.drain();
    let first = app.notifications.list_unread(app.user).await[0].clone();
    app.notifications
        .mark_read(app.user, first.id, app.clock.now())
        .await
        .unwrap();

    let mut next = HerdSnapshot::empty(helpers::as_of());
    next.deliveries.push(helpers::calving("C3", 6));
    next.deliveries.push(helpers::calving("C5", 6));
    app.snapshots.replace(next).await;
    let report = app.tick().await;
    assert_eq!(report.created, 1);
    assert_eq!(report.handed_off, 2);

    let unread = app.notifications.list_unread(app.user).await;
    assert_eq!(unread.len(), 1);
    assert_ne!(unread[0].id, first.id);
    assert_eq!(unread[0].dedupe_key, "delivery_due:c3,c5");
    assert_eq!(app.drain().len(), 2);
}

#[tokio::test]
async fn test_same_cow_closer_to_due_raises_priority_and_hands_off() {
    let mut snapshot = HerdSnapshot::empty(helpers::as_of());
    snapshot.deliveries.push(helpers::calving("C12", 5));
    let mut app = TestApp::new(snapshot, UserRole::Admin);

    app.tick().await;
    assert_eq!(app.drain().len(), 2);
    let before = app.notifications.list_unread(app.user).await[0].clone();
    assert_eq!(before.priority, NotificationPriority::Medium);

    // Three days later the calving is two days out.
    let mut closer = HerdSnapshot::empty(helpers::day(3));
    closer.deliveries.push(helpers::calving("C12", 5));
    app.snapshots.replace(closer).await;
    let report = app.tick().await;
    assert_eq!(report.escalated, 1);
    assert_eq!(report.handed_off, 2);
    assert_eq!(app.drain().len(), 2);

    let after = app.notifications.get(app.user, before.id).await.unwrap();
    assert_eq!(after.priority, NotificationPriority::High);
    assert_eq!(after.dedupe_key, before.dedupe_key);
    match &after.data {
        NotificationData::Cows { cows } => assert_eq!(cows[0].days_remaining, 2),
        other => panic!("expected cows, got {other:?}"),
    }

    // A day later only the count moves: refreshed, no second hand-off.
    let mut next = HerdSnapshot::empty(helpers::day(4));
    next.deliveries.push(helpers::calving("C12", 5));
    app.snapshots.replace(next).await;
    let report = app.tick().await;
    assert_eq!(report.refreshed, 1);
    assert_eq!(report.handed_off, 0);
    assert!(app.drain().is_empty());
    let latest = app.notifications.get(app.user, before.id).await.unwrap();
    assert_eq!(latest.priority, NotificationPriority::High);
}

#[tokio::test]
async fn test_condition_returning_with_other_cow_is_notified() {
    let mut snapshot = HerdSnapshot::empty(helpers::as_of());
    snapshot.pregnancy_checks.push(helpers::breeding("C14", -1));
    let mut app = TestApp::new(snapshot, UserRole::Admin);
    app.tick().await;
    app.drain();
    let first = app.notifications.list_unread(app.user).await[0].clone();
    app.notifications
        .mark_read(app.user, first.id, app.clock.now())
        .await
        .unwrap();

    app.snapshots.replace(HerdSnapshot::empty(helpers::as_of())).await;
    let cleared = app.tick().await;
    assert_eq!(cleared.candidates, 0);

    let mut back = HerdSnapshot::empty(helpers::as_of());
    back.pregnancy_checks.push(helpers::breeding("C7", 1));
    app.snapshots.replace(back).await;
    let report = app.tick().await;
    assert_eq!(report.created, 1);
    assert!(!app.drain().is_empty());

    let unread = app.notifications.list_unread(app.user).await;
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].dedupe_key, "pd_due:c7");
    assert_eq!(
        app.notifications.get(app.user, first.id).await.unwrap().status,
        NotificationStatus::Read
    );
}

#[tokio::test]
async fn test_second_vaccine_for_same_cow_escalates() {
    let mut snapshot = HerdSnapshot::empty(helpers::as_of());
    snapshot.vaccinations.push(helpers::vaccination("C7", "FMD", 2));
    let app = TestApp::new(snapshot.clone(), UserRole::Admin);
    app.tick().await;
    let before = app.notifications.list_unread(app.user).await[0].clone();
    assert_eq!(before.dedupe_key, "vaccination_due:c7/fmd");

    snapshot.vaccinations.push(helpers::vaccination("C7", "Brucella", 5));
    app.snapshots.replace(snapshot).await;
    let report = app.tick().await;
    assert_eq!(report.escalated, 1);

    let after = app.notifications.get(app.user, before.id).await.unwrap();
    assert_eq!(after.data.affected_count(), 2);
    assert_eq!(after.dedupe_key, "vaccination_due:c7/brucella,c7/fmd");
    assert!(after.message.starts_with("2 "));
}

#[tokio::test]
async fn test_dismissed_record_is_never_resurrected() {
    let mut snapshot = HerdSnapshot::empty(helpers::as_of());
    snapshot.deliveries.push(helpers::calving("C12", 2));
    let app = TestApp::new(snapshot, UserRole::Admin);

    app.tick().await;
    let original = app.notifications.list_unread(app.user).await[0].clone();
    app.notifications
        .dismiss(app.user, original.id, app.clock.now())
        .await
        .unwrap();

    let report = app.tick().await;
    assert_eq!(report.created, 1);

    let unread = app.notifications.list_unread(app.user).await;
    assert_eq!(unread.len(), 1);
    assert_ne!(unread[0].id, original.id);
    assert_eq!(unread[0].dedupe_key, original.dedupe_key);

    let old = app.notifications.get(app.user, original.id).await.unwrap();
    assert_eq!(old.status, NotificationStatus::Dismissed);
}

#[tokio::test]
async fn test_failing_query_skips_only_its_detector() {
    let mut snapshot = HerdSnapshot::empty(helpers::as_of());
    snapshot.feed.push(helpers::feed("silage", "Silage", 5.0, 20.0));
    snapshot.vaccinations.push(helpers::vaccination("C7", "FMD", 1));
    let app = TestApp::with_provider(snapshot, UserRole::Admin, |inner| {
        Arc::new(VaccinationOutage(inner))
    });

    let report = app.tick().await;
    assert_eq!(report.skipped_detectors, vec![NotificationType::VaccinationDue]);
    assert_eq!(report.created, 1);

    let unread = app.notifications.list_unread(app.user).await;
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].kind, NotificationType::LowStock);
}

#[tokio::test]
async fn test_cancelled_tick_writes_nothing() {
    let mut snapshot = HerdSnapshot::empty(helpers::as_of());
    snapshot.feed.push(helpers::feed("silage", "Silage", 5.0, 20.0));
    let app = TestApp::new(snapshot, UserRole::Admin);

    let cancel = CancellationToken::new();
    cancel.cancel();
    let report = app.tick.run(&cancel).await.unwrap();
    assert!(report.cancelled);
    assert_eq!(report.created, 0);
    assert!(app.notifications.export().await.is_empty());
}

#[tokio::test]
async fn test_entities_outside_window_are_ignored() {
    let mut snapshot = HerdSnapshot::empty(helpers::as_of());
    snapshot.deliveries.push(helpers::calving("C9", 19));
    snapshot.inseminations.push(helpers::breeding("C31", 4));
    snapshot.feed.push(helpers::feed("hay", "Hay", 80.0, 40.0));
    let app = TestApp::new(snapshot, UserRole::Admin);

    let report = app.tick().await;
    assert_eq!(report.candidates, 0);
    assert!(app.notifications.list_unread(app.user).await.is_empty());
}
