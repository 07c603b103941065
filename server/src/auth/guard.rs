//! Route Guards
//!
//! Handler-local checks that either hand back a session satisfying the
//! required role or end the request with a redirect carrying an
//! `auth_trigger` reason code. Guards do not log and do not mutate anything,
//! so calling one twice with the same session gives the same answer.

use std::convert::Infallible;
use std::fmt;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use kd_common::{Role, Session};

use super::error::GuardError;
use super::session::{resolve_request_session, ResolvedSession};
use crate::api::AppState;

/// Reason code attached to a guard redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthTrigger {
    /// No valid session.
    LoginRequired,
    /// Session is not an administrator.
    AdminRequired,
    /// Session does not hold the given role.
    RoleRequired(Role),
}

impl AuthTrigger {
    /// Value of the `auth_trigger` query parameter.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::LoginRequired => "login_required",
            Self::AdminRequired => "admin_required",
            Self::RoleRequired(_) => "role_required",
        }
    }

    /// Query string for this trigger, without the leading `?`.
    #[must_use]
    pub fn query(&self) -> String {
        match self {
            Self::LoginRequired | Self::AdminRequired => format!("auth_trigger={}", self.code()),
            Self::RoleRequired(role) => format!("auth_trigger={}&role={role}", self.code()),
        }
    }
}

impl fmt::Display for AuthTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Build a redirect location: `fallback` plus the trigger query.
///
/// The query goes before any `#fragment` of the fallback.
#[must_use]
pub fn redirect_location(fallback: &str, trigger: AuthTrigger) -> String {
    let (base, fragment) = match fallback.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (fallback, None),
    };
    let separator = if base.contains('?') { '&' } else { '?' };

    match fragment {
        Some(fragment) => format!("{base}{separator}{}#{fragment}", trigger.query()),
        None => format!("{base}{separator}{}", trigger.query()),
    }
}

/// Require any valid session.
pub fn require_auth(session: Option<&Session>, fallback: &str) -> Result<Session, GuardError> {
    session.cloned().ok_or_else(|| GuardError::Unauthenticated {
        fallback: fallback.to_string(),
    })
}

/// Require an administrator session.
pub fn require_admin(session: Option<&Session>, fallback: &str) -> Result<Session, GuardError> {
    let session = require_auth(session, fallback)?;
    if session.is_admin() {
        Ok(session)
    } else {
        Err(GuardError::Forbidden {
            fallback: fallback.to_string(),
            trigger: AuthTrigger::AdminRequired,
        })
    }
}

/// Require a session whose role equals `role`.
pub fn require_role(
    session: Option<&Session>,
    role: Role,
    fallback: &str,
) -> Result<Session, GuardError> {
    let session = require_auth(session, fallback)?;
    if session.has_role(role) {
        Ok(session)
    } else {
        Err(GuardError::Forbidden {
            fallback: fallback.to_string(),
            trigger: AuthTrigger::RoleRequired(role),
        })
    }
}

/// Session of the current request, as seen by handlers.
///
/// Reuses the edge gate's resolution when the gate ran; otherwise resolves the
/// request's token itself. A resolver fault yields an empty session.
///
/// ```ignore
/// async fn profile(session: RequestSession) -> Result<Json<Session>, GuardError> {
///     Ok(Json(session.require_auth("/")?))
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestSession(Option<Session>);

impl RequestSession {
    #[must_use]
    pub const fn new(session: Option<Session>) -> Self {
        Self(session)
    }

    /// The resolved session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.0.as_ref()
    }

    pub fn require_auth(&self, fallback: &str) -> Result<Session, GuardError> {
        require_auth(self.session(), fallback)
    }

    pub fn require_admin(&self, fallback: &str) -> Result<Session, GuardError> {
        require_admin(self.session(), fallback)
    }

    pub fn require_role(&self, role: Role, fallback: &str) -> Result<Session, GuardError> {
        require_role(self.session(), role, fallback)
    }

    /// Consume into the inner session.
    #[must_use]
    pub fn into_inner(self) -> Option<Session> {
        self.0
    }
}

impl FromRequestParts<AppState> for RequestSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ResolvedSession(session)) = parts.extensions.get::<ResolvedSession>() {
            return Ok(Self(session.clone()));
        }

        let session = resolve_request_session(
            state.sessions.as_ref(),
            &parts.headers,
            &state.config.session_cookie_name,
        )
        .await;

        Ok(Self(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn member() -> Session {
        Session::new(Uuid::now_v7(), Role::User)
    }

    fn admin() -> Session {
        Session::new(Uuid::now_v7(), Role::Admin)
    }

    #[test]
    fn test_trigger_queries() {
        assert_eq!(AuthTrigger::LoginRequired.query(), "auth_trigger=login_required");
        assert_eq!(AuthTrigger::AdminRequired.query(), "auth_trigger=admin_required");
        assert_eq!(
            AuthTrigger::RoleRequired(Role::Admin).query(),
            "auth_trigger=role_required&role=ADMIN"
        );
    }

    #[test]
    fn test_redirect_location_appends_to_existing_query() {
        assert_eq!(
            redirect_location("/", AuthTrigger::LoginRequired),
            "/?auth_trigger=login_required"
        );
        assert_eq!(
            redirect_location("/notice?page=2", AuthTrigger::AdminRequired),
            "/notice?page=2&auth_trigger=admin_required"
        );
    }

    #[test]
    fn test_redirect_location_keeps_fragment_last() {
        assert_eq!(
            redirect_location("/#notices", AuthTrigger::LoginRequired),
            "/?auth_trigger=login_required#notices"
        );
        assert_eq!(
            redirect_location("/notice?page=2#top", AuthTrigger::RoleRequired(Role::Admin)),
            "/notice?page=2&auth_trigger=role_required&role=ADMIN#top"
        );
    }

    #[test]
    fn test_require_auth_without_session() {
        let err = require_auth(None, "/").unwrap_err();
        assert_eq!(err.trigger(), AuthTrigger::LoginRequired);
        assert_eq!(err.location(), "/?auth_trigger=login_required");
    }

    #[test]
    fn test_require_auth_returns_session() {
        let session = member();
        assert_eq!(require_auth(Some(&session), "/").unwrap(), session);
    }

    #[test]
    fn test_require_admin_rejects_member() {
        let session = member();
        let err = require_admin(Some(&session), "/notice").unwrap_err();
        assert_eq!(err.location(), "/notice?auth_trigger=admin_required");
    }

    #[test]
    fn test_require_admin_without_session_asks_for_login() {
        let err = require_admin(None, "/notice").unwrap_err();
        assert_eq!(err.location(), "/notice?auth_trigger=login_required");
    }

    #[test]
    fn test_require_admin_accepts_admin() {
        let session = admin();
        assert_eq!(require_admin(Some(&session), "/").unwrap(), session);
    }

    #[test]
    fn test_require_role_mismatch() {
        let session = member();
        let err = require_role(Some(&session), Role::Admin, "/").unwrap_err();
        assert_eq!(err.location(), "/?auth_trigger=role_required&role=ADMIN");

        let session = admin();
        let err = require_role(Some(&session), Role::User, "/").unwrap_err();
        assert_eq!(err.location(), "/?auth_trigger=role_required&role=USER");
    }

    #[test]
    fn test_require_role_match() {
        let session = member();
        assert!(require_role(Some(&session), Role::User, "/").is_ok());
    }

    #[test]
    fn test_guards_are_idempotent() {
        let guard = RequestSession::new(Some(member()));
        assert_eq!(guard.require_auth("/"), guard.require_auth("/"));
        assert_eq!(guard.require_admin("/"), guard.require_admin("/"));
        assert_eq!(
            guard.require_role(Role::Admin, "/"),
            guard.require_role(Role::Admin, "/")
        );

        let anonymous = RequestSession::default();
        assert_eq!(anonymous.require_auth("/"), anonymous.require_auth("/"));
    }
}
