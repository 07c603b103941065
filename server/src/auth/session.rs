//! Session Resolution
//!
//! Turns the token carried by a request into a [`Session`]. Resolvers are
//! injected into the application state; nothing here is global.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;
use futures::future::BoxFuture;
use kd_common::Session;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use super::error::ResolveError;
use super::jwt::validate_session_token;
use crate::db::find_user_by_id;

/// Resolves a session token to a session.
///
/// `Ok(None)` means there is no session (unknown user, bad or expired
/// token). `Err` means the resolver itself faulted.
pub trait SessionResolver: Send + Sync {
    fn resolve<'a>(&'a self, token: &'a str)
        -> BoxFuture<'a, Result<Option<Session>, ResolveError>>;
}

/// Outcome of session resolution, stored in request extensions by the edge
/// gate so guards don't resolve twice.
#[derive(Debug, Clone)]
pub struct ResolvedSession(pub Option<Session>);

/// Database-backed resolver.
///
/// The token only proves identity; role and profile come from the `users` row.
#[derive(Clone)]
pub struct PgSessionResolver {
    pool: PgPool,
    secret: String,
}

impl PgSessionResolver {
    #[must_use]
    pub const fn new(pool: PgPool, secret: String) -> Self {
        Self { pool, secret }
    }
}

impl SessionResolver for PgSessionResolver {
    fn resolve<'a>(
        &'a self,
        token: &'a str,
    ) -> BoxFuture<'a, Result<Option<Session>, ResolveError>> {
        Box::pin(async move {
            let Ok(claims) = validate_session_token(token, &self.secret) else {
                return Ok(None);
            };
            let Ok(user_id) = claims.sub.parse::<Uuid>() else {
                return Ok(None);
            };

            match find_user_by_id(&self.pool, user_id).await? {
                Some(user) => Ok(Some(user.into_session()?)),
                None => Ok(None),
            }
        })
    }
}

/// Stateless resolver trusting the claims embedded in the signed token.
#[derive(Clone)]
pub struct ClaimsSessionResolver {
    secret: String,
}

impl ClaimsSessionResolver {
    #[must_use]
    pub const fn new(secret: String) -> Self {
        Self { secret }
    }
}

impl SessionResolver for ClaimsSessionResolver {
    fn resolve<'a>(
        &'a self,
        token: &'a str,
    ) -> BoxFuture<'a, Result<Option<Session>, ResolveError>> {
        Box::pin(async move {
            Ok(validate_session_token(token, &self.secret)
                .and_then(|claims| claims.into_session())
                .ok())
        })
    }
}

/// Extract the session token: cookie first, then `Authorization: Bearer`.
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(cookie_name).filter(|c| !c.value().is_empty()) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
}

/// Resolve the session carried by `headers`.
///
/// Fails closed: a resolver fault is logged and treated as no session.
pub async fn resolve_request_session(
    resolver: &dyn SessionResolver,
    headers: &HeaderMap,
    cookie_name: &str,
) -> Option<Session> {
    let token = extract_session_token(headers, cookie_name)?;

    match resolver.resolve(&token).await {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "Session resolution failed, treating request as unauthenticated");
            None
        }
    }
}
