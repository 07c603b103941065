//! Session Types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Role;

/// Per-request proof of identity plus role and profile claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// User ID.
    pub user_id: Uuid,
    /// Role of the user.
    pub role: Role,
    /// Display name (if set during profile setup).
    pub name: Option<String>,
    /// Email (if provided by the identity provider).
    pub email: Option<String>,
    /// Phone number (if set during profile setup).
    pub phone: Option<String>,
}

impl Session {
    /// Create a session with no profile fields.
    #[must_use]
    pub const fn new(user_id: Uuid, role: Role) -> Self {
        Self {
            user_id,
            role,
            name: None,
            email: None,
            phone: None,
        }
    }

    /// Role equality check.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// Whether this session belongs to an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        match self.role {
            Role::Admin => true,
            Role::User => false,
        }
    }
}
