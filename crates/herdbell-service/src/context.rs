//! Request context carrying the acting user and their resolved role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use herdbell_core::types::UserId;
use herdbell_entity::user::UserRole;

/// Context for one presentation-layer call.
///
/// The role arrives already resolved; the engine never authenticates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's ID.
    pub user_id: UserId,
    /// The user's role at the time of the request.
    pub role: UserRole,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self {
            user_id,
            role,
            request_time: Utc::now(),
        }
    }
}
