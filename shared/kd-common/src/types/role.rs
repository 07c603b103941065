//! User Roles

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Privilege level of a user.
///
/// Every persisted user carries exactly one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Ordinary member: volunteers, applicants.
    #[default]
    User,
    /// Administrator: manages notices and volunteer activities.
    Admin,
}

impl Role {
    /// Wire name used in tokens, the database and redirect query strings.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }

    /// Returns all roles as a slice.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::User, Self::Admin]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            other => Err(Error::UnknownRole(other.to_string())),
        }
    }
}
