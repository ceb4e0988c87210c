//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles that drive the default notification settings.
///
/// Roles arrive already resolved by the caller; the engine never
/// authenticates anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Farm owner or manager.
    Admin,
    /// Staff doing the daily work.
    Worker,
    /// Anyone else (read-only accounts, accountants, vets).
    Viewer,
}

impl UserRole {
    /// Map any role name onto the three known roles.
    ///
    /// Unknown names fall back to [`UserRole::Viewer`], which has every
    /// category disabled by default.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "admin" => Self::Admin,
            "worker" => Self::Worker,
            _ => Self::Viewer,
        }
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Worker => "worker",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = herdbell_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "worker" => Ok(Self::Worker),
            "viewer" => Ok(Self::Viewer),
            _ => Err(herdbell_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, worker, viewer"
            ))),
        }
    }
}
