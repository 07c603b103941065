//! Database Models

use chrono::{DateTime, Utc};
use kd_common::{Role, Session};
use sqlx::FromRow;
use uuid::Uuid;

/// User row, limited to what session resolution reads.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    /// Role wire name (`USER` or `ADMIN`).
    pub role: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build the session for this user.
    ///
    /// Fails if the stored role is not part of the role set.
    pub fn into_session(self) -> kd_common::Result<Session> {
        let role: Role = self.role.parse()?;

        Ok(Session {
            user_id: self.id,
            role,
            name: self.name,
            email: self.email,
            phone: self.phone,
        })
    }
}
