//! Role default table.

use std::collections::BTreeMap;

use herdbell_entity::notification::{CategorySetting, DeliveryChannel, NotificationCategory};
use herdbell_entity::user::UserRole;

/// Default setting of every category for `role`.
///
/// | role | reminders | alerts | updates |
/// |---|---|---|---|
/// | admin | on, in_app + email | on, in_app + email | on, in_app |
/// | worker | on, in_app | on, in_app | off, in_app |
/// | viewer | off, in_app | off, in_app | off, in_app |
pub fn role_defaults(role: UserRole) -> BTreeMap<NotificationCategory, CategorySetting> {
    use DeliveryChannel::{Email, InApp};
    use NotificationCategory::{Alerts, Reminders, Updates};

    let table: [(NotificationCategory, bool, Vec<DeliveryChannel>); 3] = match role {
        UserRole::Admin => [
            (Reminders, true, vec![InApp, Email]),
            (Alerts, true, vec![InApp, Email]),
            (Updates, true, vec![InApp]),
        ],
        UserRole::Worker => [
            (Reminders, true, vec![InApp]),
            (Alerts, true, vec![InApp]),
            (Updates, false, vec![InApp]),
        ],
        UserRole::Viewer => [
            (Reminders, false, vec![InApp]),
            (Alerts, false, vec![InApp]),
            (Updates, false, vec![InApp]),
        ],
    };

    table
        .into_iter()
        .map(|(category, enabled, channels)| {
            (
                category,
                CategorySetting::new(category, enabled, channels),
            )
        })
        .collect()
}
