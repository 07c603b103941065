//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for sending requests through the full axum router via
//! `tower::ServiceExt::oneshot`, plus session and token helpers. Sessions are
//! resolved from signed tokens by default, so no database is needed.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, COOKIE, LOCATION};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use futures::future::BoxFuture;
use http_body_util::BodyExt;
use kd_common::{Role, Session};
use kd_server::api::{create_router, AppState};
use kd_server::auth::jwt::issue_session_token;
use kd_server::auth::{ClaimsSessionResolver, ResolveError, SessionResolver};
use kd_server::config::Config;
use kd_server::pages;
use tower::ServiceExt;
use uuid::Uuid;

// ============================================================================
// Resolvers
// ============================================================================

/// Resolver backed by a fixed token → session map.
#[derive(Default)]
pub struct StaticSessionResolver {
    sessions: HashMap<String, Session>,
}

impl StaticSessionResolver {
    pub fn with(mut self, token: &str, session: Session) -> Self {
        self.sessions.insert(token.to_string(), session);
        self
    }
}

impl SessionResolver for StaticSessionResolver {
    fn resolve<'a>(
        &'a self,
        token: &'a str,
    ) -> BoxFuture<'a, Result<Option<Session>, ResolveError>> {
        Box::pin(async move { Ok(self.sessions.get(token).cloned()) })
    }
}

/// Static resolver that counts how often it is asked.
#[derive(Default)]
pub struct CountingResolver {
    inner: StaticSessionResolver,
    calls: AtomicUsize,
}

impl CountingResolver {
    pub fn with(self, token: &str, session: Session) -> Self {
        Self {
            inner: self.inner.with(token, session),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `resolve` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SessionResolver for CountingResolver {
    fn resolve<'a>(
        &'a self,
        token: &'a str,
    ) -> BoxFuture<'a, Result<Option<Session>, ResolveError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(token)
    }
}

/// Resolver that always faults, as a broken session store would.
pub struct FaultyResolver;

impl SessionResolver for FaultyResolver {
    fn resolve<'a>(
        &'a self,
        _token: &'a str,
    ) -> BoxFuture<'a, Result<Option<Session>, ResolveError>> {
        Box::pin(async { Err(ResolveError::Database(sqlx::Error::PoolTimedOut)) })
    }
}

// ============================================================================
// Test App
// ============================================================================

/// Full router plus the config it was built from.
pub struct TestApp {
    pub router: Router,
    pub config: Arc<Config>,
}

impl TestApp {
    /// Test app resolving sessions from signed token claims.
    pub fn new() -> Self {
        let config = Config::default_for_test();
        let resolver = Arc::new(ClaimsSessionResolver::new(config.session_secret.clone()));
        Self::with_resolver(config, resolver)
    }

    /// Test app with a custom config and resolver.
    pub fn with_resolver(config: Config, sessions: Arc<dyn SessionResolver>) -> Self {
        let state = AppState::new(config.clone(), sessions).expect("Invalid test gate config");
        Self {
            router: create_router(state),
            config: Arc::new(config),
        }
    }

    /// Page routes only, with no edge gate in front of them.
    ///
    /// Handlers resolve the session themselves through `RequestSession`.
    pub fn pages_without_gate(config: Config, sessions: Arc<dyn SessionResolver>) -> Self {
        let state = AppState::new(config.clone(), sessions).expect("Invalid test gate config");
        Self {
            router: Router::new().merge(pages::router()).with_state(state),
            config: Arc::new(config),
        }
    }

    /// Issue a session token valid for this app.
    pub fn token_for(&self, session: &Session) -> String {
        issue_session_token(session, &self.config.session_secret, self.config.session_expiry)
            .expect("Failed to issue session token")
    }

    /// Send a request through the router.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// GET without any session token.
    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.oneshot(request(Method::GET, uri).body(Body::empty()).unwrap())
            .await
    }

    /// GET with the session token in the session cookie.
    pub async fn get_with_cookie(&self, uri: &str, token: &str) -> Response<Body> {
        let cookie = format!("{}={token}", self.config.session_cookie_name);
        self.oneshot(
            request(Method::GET, uri)
                .header(COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// GET with the session token as a bearer token.
    pub async fn get_with_bearer(&self, uri: &str, token: &str) -> Response<Body> {
        self.oneshot(
            request(Method::GET, uri)
                .header(AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

/// Build an HTTP request with the given method and URI.
pub fn request(method: Method, uri: &str) -> axum::http::request::Builder {
    Request::builder().method(method).uri(uri)
}

// ============================================================================
// Sessions & responses
// ============================================================================

/// Ordinary member with a completed profile.
pub fn member_session() -> Session {
    Session {
        name: Some("김봉사".to_string()),
        email: Some("volunteer@example.com".to_string()),
        phone: Some("010-1234-5678".to_string()),
        ..Session::new(Uuid::now_v7(), Role::User)
    }
}

/// Administrator.
pub fn admin_session() -> Session {
    Session {
        name: Some("관리자".to_string()),
        ..Session::new(Uuid::now_v7(), Role::Admin)
    }
}

/// Assert a temporary redirect and return its `Location`.
pub fn redirect_location(response: &Response<Body>) -> String {
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    response
        .headers()
        .get(LOCATION)
        .expect("redirect without Location header")
        .to_str()
        .expect("non-ASCII Location header")
        .to_string()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
