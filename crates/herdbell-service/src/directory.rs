//! Registered users and their resolved roles.

use std::collections::BTreeMap;

use async_trait::async_trait;

use herdbell_core::config::UserEntry;
use herdbell_core::error::{AppError, ErrorKind};
use herdbell_core::result::AppResult;
use herdbell_core::types::UserId;
use herdbell_entity::user::UserRole;

/// Source of the users the tick evaluates and their roles.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Every registered user.
    async fn users(&self) -> AppResult<Vec<UserId>>;

    /// The resolved role of `user_id`.
    async fn role_of(&self, user_id: UserId) -> AppResult<UserRole>;
}

/// A fixed user list, typically taken from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticUserDirectory {
    users: BTreeMap<UserId, UserRole>,
}

impl StaticUserDirectory {
    /// Build from `(user, role)` pairs.
    pub fn new(users: impl IntoIterator<Item = (UserId, UserRole)>) -> Self {
        Self {
            users: users.into_iter().collect(),
        }
    }

    /// Build from the `users` configuration section.
    ///
    /// Unknown role names resolve to `viewer`.
    pub fn from_config(entries: &[UserEntry]) -> AppResult<Self> {
        let mut users = BTreeMap::new();
        for entry in entries {
            let id: UserId = entry.id.parse().map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Invalid user id '{}'", entry.id),
                    e,
                )
            })?;
            users.insert(id, UserRole::from_name(&entry.role));
        }
        Ok(Self { users })
    }

    /// Number of registered users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// No users are registered.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn users(&self) -> AppResult<Vec<UserId>> {
        Ok(self.users.keys().copied().collect())
    }

    async fn role_of(&self, user_id: UserId) -> AppResult<UserRole> {
        self.users
            .get(&user_id)
            .copied()
            .ok_or_else(|| AppError::not_found(format!("User {user_id} is not registered")))
    }
}
