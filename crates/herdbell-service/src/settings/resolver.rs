//! Effective settings: role defaults overlaid with stored overrides.

use std::collections::BTreeMap;
use std::sync::Arc;

use herdbell_core::types::UserId;
use herdbell_entity::notification::{CategorySetting, NotificationCategory};
use herdbell_entity::user::UserRole;
use herdbell_store::SettingsRepository;

use super::defaults::role_defaults;

/// Overlay `overrides` onto the defaults of `role`.
///
/// An override replaces the whole setting of its category.
pub fn resolve(
    role: UserRole,
    overrides: BTreeMap<NotificationCategory, CategorySetting>,
) -> BTreeMap<NotificationCategory, CategorySetting> {
    let mut effective = role_defaults(role);
    effective.extend(overrides);
    effective
}

/// Resolves effective settings from the override store.
#[derive(Debug, Clone)]
pub struct SettingsResolver {
    repo: Arc<SettingsRepository>,
}

impl SettingsResolver {
    /// Creates a resolver over `repo`.
    pub fn new(repo: Arc<SettingsRepository>) -> Self {
        Self { repo }
    }

    /// Effective settings of every category for `user_id`.
    pub fn effective(
        &self,
        user_id: UserId,
        role: UserRole,
    ) -> BTreeMap<NotificationCategory, CategorySetting> {
        resolve(role, self.repo.find_by_user(user_id))
    }

    /// Effective setting of one category for `user_id`.
    pub fn effective_for(
        &self,
        user_id: UserId,
        role: UserRole,
        category: NotificationCategory,
    ) -> CategorySetting {
        self.repo
            .find_by_user(user_id)
            .remove(&category)
            .or_else(|| role_defaults(role).remove(&category))
            .unwrap_or_else(|| CategorySetting::new(category, false, []))
    }
}
