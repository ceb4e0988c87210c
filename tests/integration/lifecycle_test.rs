//! Integration tests for the read, dismiss, and snooze lifecycle.

mod helpers;

use chrono::Duration;

use herdbell_core::error::ErrorKind;
use herdbell_entity::herd::HerdSnapshot;
use herdbell_entity::notification::{NotificationStatus, NotificationType};
use herdbell_entity::user::UserRole;

use helpers::TestApp;

fn herd() -> HerdSnapshot {
    let mut snapshot = HerdSnapshot::empty(helpers::as_of());
    snapshot.feed.push(helpers::feed("silage", "Silage", 5.0, 20.0));
    snapshot.pregnancy_checks.push(helpers::breeding("C14", 2));
    snapshot
}

#[tokio::test]
async fn test_snooze_then_sweep_returns_to_unread() {
    let app = TestApp::new(herd(), UserRole::Admin);
    app.tick().await;
    let service = app.notification_service();
    let ctx = app.ctx();

    let unread = service.list_unread(&ctx).await;
    assert_eq!(unread.len(), 2);
    let target = unread[0].id;

    let snoozed = service.snooze(&ctx, target, Duration::hours(1)).await.unwrap();
    assert_eq!(snoozed.status, NotificationStatus::Snoozed);
    assert!(service.list_unread(&ctx).await.iter().all(|n| n.id != target));
    assert_eq!(service.unread_count(&ctx).await, 1);

    app.clock.advance(Duration::minutes(30));
    let report = app.tick().await;
    assert_eq!(report.reactivated, 0);

    app.clock.advance(Duration::minutes(31));
    let report = app.tick().await;
    assert_eq!(report.reactivated, 1);

    let back = service.get(&ctx, target).await.unwrap();
    assert_eq!(back.status, NotificationStatus::Sent);
    assert!(back.snoozed_until.is_none());
    assert!(service.list_unread(&ctx).await.iter().any(|n| n.id == target));
}

#[tokio::test]
async fn test_snooze_requires_positive_duration() {
    let app = TestApp::new(herd(), UserRole::Admin);
    app.tick().await;
    let service = app.notification_service();
    let ctx = app.ctx();
    let id = service.list_unread(&ctx).await[0].id;

    let err = service.snooze(&ctx, id, Duration::zero()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_read_keeps_first_read_time() {
    let app = TestApp::new(herd(), UserRole::Admin);
    app.tick().await;
    let service = app.notification_service();
    let ctx = app.ctx();
    let id = service.list_unread(&ctx).await[0].id;

    let first = service.mark_as_read(&ctx, id).await.unwrap();
    app.clock.advance(Duration::minutes(5));
    let second = service.mark_as_read(&ctx, id).await.unwrap();

    assert_eq!(first.status, NotificationStatus::Read);
    assert_eq!(second.read_at, first.read_at);
    assert_eq!(second.version, first.version);
}

#[tokio::test]
async fn test_dismiss_is_idempotent_and_hides_record() {
    let app = TestApp::new(herd(), UserRole::Admin);
    app.tick().await;
    let service = app.notification_service();
    let ctx = app.ctx();
    let id = service.list_unread(&ctx).await[0].id;

    let dismissed = service.dismiss(&ctx, id).await.unwrap();
    let again = service.dismiss(&ctx, id).await.unwrap();
    assert_eq!(dismissed.status, NotificationStatus::Dismissed);
    assert_eq!(again.dismissed_at, dismissed.dismissed_at);
    assert_eq!(service.unread_count(&ctx).await, 1);

    let history = service
        .history(&ctx, None, Some(NotificationStatus::Dismissed), None)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, id);
}

#[tokio::test]
async fn test_mark_all_read_and_counts() {
    let app = TestApp::new(herd(), UserRole::Admin);
    app.tick().await;
    let service = app.notification_service();
    let ctx = app.ctx();

    // Silage at 5 of 20 is critical; C14's PD is not overdue.
    assert_eq!(service.high_priority_count(&ctx).await, 1);
    assert_eq!(service.mark_all_as_read(&ctx).await, 2);
    assert_eq!(service.unread_count(&ctx).await, 0);
    assert_eq!(service.high_priority_count(&ctx).await, 0);
    assert_eq!(service.mark_all_as_read(&ctx).await, 0);
}

#[tokio::test]
async fn test_history_window_and_search() {
    let app = TestApp::new(herd(), UserRole::Admin);
    app.tick().await;
    let service = app.notification_service();
    let ctx = app.ctx();

    let found = service.history(&ctx, Some(7), None, Some("SILAGE")).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, NotificationType::LowStock);

    app.clock.advance(Duration::days(10));
    assert!(service.history(&ctx, Some(7), None, None).await.unwrap().is_empty());
    assert_eq!(service.history(&ctx, None, None, None).await.unwrap().len(), 2);

    let err = service.history(&ctx, Some(0), None, None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_other_users_records_are_not_found() {
    let app = TestApp::new(herd(), UserRole::Admin);
    app.tick().await;
    let service = app.notification_service();
    let id = service.list_unread(&app.ctx()).await[0].id;

    let stranger = herdbell_service::RequestContext::new(
        herdbell_core::types::UserId::new(),
        UserRole::Admin,
    );
    let err = service.mark_as_read(&stranger, id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
