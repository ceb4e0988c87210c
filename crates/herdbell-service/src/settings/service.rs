//! User-facing settings operations.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use herdbell_core::result::AppResult;
use herdbell_entity::notification::{CategorySetting, NotificationCategory, SettingUpdate};
use herdbell_entity::user::UserRole;
use herdbell_store::SettingsRepository;

use super::defaults::role_defaults;
use super::resolver::SettingsResolver;
use crate::context::RequestContext;

/// Reads and updates the caller's category settings.
#[derive(Debug, Clone)]
pub struct SettingsService {
    repo: Arc<SettingsRepository>,
    resolver: SettingsResolver,
}

impl SettingsService {
    /// Creates a new settings service.
    pub fn new(repo: Arc<SettingsRepository>) -> Self {
        let resolver = SettingsResolver::new(Arc::clone(&repo));
        Self { repo, resolver }
    }

    /// Effective settings for the caller's role and stored overrides.
    pub fn get_settings(&self, ctx: &RequestContext) -> BTreeMap<NotificationCategory, CategorySetting> {
        self.resolver.effective(ctx.user_id, ctx.role)
    }

    /// Merge `update` over the current effective setting and store the
    /// result as the full override for `category`.
    pub fn update_setting(
        &self,
        ctx: &RequestContext,
        category: NotificationCategory,
        update: &SettingUpdate,
    ) -> AppResult<CategorySetting> {
        let current = self.resolver.effective_for(ctx.user_id, ctx.role, category);
        let merged = update.apply_to(&current);
        merged.validate()?;

        self.repo.upsert(ctx.user_id, merged.clone());
        info!(
            user_id = %ctx.user_id,
            category = %category,
            enabled = merged.enabled,
            channels = merged.channels.len(),
            quiet_hours = merged.quiet_hours.is_some(),
            "Category setting updated"
        );
        Ok(merged)
    }

    /// Store the default table of `role` as the caller's overrides for
    /// every category.
    pub fn apply_role_defaults(
        &self,
        ctx: &RequestContext,
        role: UserRole,
    ) -> BTreeMap<NotificationCategory, CategorySetting> {
        let defaults = role_defaults(role);
        for setting in defaults.values() {
            self.repo.upsert(ctx.user_id, setting.clone());
        }
        info!(user_id = %ctx.user_id, role = %role, "Role defaults applied");
        defaults
    }
}
