//! Authentication Error Types

use axum::response::{IntoResponse, Redirect, Response};
use thiserror::Error;

use super::guard::{redirect_location, AuthTrigger};

/// Guard failure, always answered with a redirect.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GuardError {
    /// No valid session.
    #[error("Login required")]
    Unauthenticated {
        /// Where the visitor is sent.
        fallback: String,
    },

    /// Valid session, but the role predicate failed.
    #[error("Access denied ({trigger})")]
    Forbidden {
        /// Where the visitor is sent.
        fallback: String,
        /// Reason code carried in the redirect query.
        trigger: AuthTrigger,
    },
}

impl GuardError {
    /// Reason code for this failure.
    #[must_use]
    pub fn trigger(&self) -> AuthTrigger {
        match self {
            Self::Unauthenticated { .. } => AuthTrigger::LoginRequired,
            Self::Forbidden { trigger, .. } => *trigger,
        }
    }

    /// Redirect target, fallback path plus the `auth_trigger` query.
    #[must_use]
    pub fn location(&self) -> String {
        let fallback = match self {
            Self::Unauthenticated { fallback } | Self::Forbidden { fallback, .. } => fallback,
        };
        redirect_location(fallback, self.trigger())
    }
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        Redirect::temporary(&self.location()).into_response()
    }
}

/// Session resolver fault.
///
/// Never reaches a client: the gate and guards treat it as "no session".
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Database error while loading the user.
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    /// Stored role is not part of the role set.
    #[error("Invalid stored role")]
    Role(#[from] kd_common::Error),
}

/// Session token error.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, malformed token or wrong claims.
    #[error("Invalid session token")]
    Invalid,

    /// Token has expired.
    #[error("Session token expired")]
    Expired,

    /// Expiry does not fit in a timestamp.
    #[error("Session expiry out of range: {0} seconds")]
    ExpiryOutOfRange(i64),

    /// Encoding failure.
    #[error("Token error")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}
