//! Per-user category-setting overrides.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use herdbell_core::types::UserId;
use herdbell_entity::notification::{CategorySetting, NotificationCategory};

/// A stored override with its owner, as written to checkpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSetting {
    /// Owner of the override.
    pub user_id: UserId,
    /// The full replacement setting.
    pub setting: CategorySetting,
}

/// Overrides keyed by user, at most one per (user, category).
///
/// Overrides are only ever overwritten, never deleted.
#[derive(Debug, Clone, Default)]
pub struct SettingsRepository {
    overrides: Arc<DashMap<UserId, BTreeMap<NotificationCategory, CategorySetting>>>,
}

impl SettingsRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every override stored for `user_id`.
    pub fn find_by_user(&self, user_id: UserId) -> BTreeMap<NotificationCategory, CategorySetting> {
        self.overrides
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Store `setting` as the override for its category.
    pub fn upsert(&self, user_id: UserId, setting: CategorySetting) {
        self.overrides
            .entry(user_id)
            .or_default()
            .insert(setting.category, setting);
    }

    /// Copy of every stored override.
    pub fn export(&self) -> Vec<StoredSetting> {
        let mut all: Vec<StoredSetting> = self
            .overrides
            .iter()
            .flat_map(|entry| {
                let user_id = *entry.key();
                entry
                    .value()
                    .values()
                    .cloned()
                    .map(move |setting| StoredSetting { user_id, setting })
                    .collect::<Vec<_>>()
            })
            .collect();
        all.sort_by(|a, b| {
            a.user_id
                .cmp(&b.user_id)
                .then(a.setting.category.cmp(&b.setting.category))
        });
        all
    }

    /// Replace the contents of the repository.
    pub fn import(&self, stored: Vec<StoredSetting>) {
        self.overrides.clear();
        for entry in stored {
            self.upsert(entry.user_id, entry.setting);
        }
    }
}
