//! Server Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{bail, Context, Result};
use std::env;

use crate::auth::gate::{Access, EdgeGate, GateRule, PathPattern, PatternError};

/// Which resolver turns a session token into a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStrategy {
    /// Validate the token, then load the user row from `PostgreSQL`.
    Database,
    /// Trust the role and profile claims embedded in the signed token.
    Jwt,
}

impl std::str::FromStr for SessionStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "database" | "db" => Ok(Self::Database),
            "jwt" => Ok(Self::Jwt),
            other => bail!("Unknown SESSION_STRATEGY: {other}"),
        }
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,

    /// `PostgreSQL` connection URL (required for the database strategy)
    pub database_url: Option<String>,

    /// HS256 secret used to sign and verify session tokens
    pub session_secret: String,

    /// Session token validity in seconds (default: 2592000 = 30 days).
    ///
    /// Read by whatever issues session tokens (the sign-in callback); the gate
    /// itself only checks `exp`.
    pub session_expiry: i64,

    /// Name of the cookie carrying the session token
    pub session_cookie_name: String,

    /// Session resolution strategy
    pub session_strategy: SessionStrategy,

    /// Where unauthenticated visitors are sent (default: "/")
    pub landing_path: String,

    /// Path patterns that require a session
    pub protected_paths: Vec<String>,

    /// Path patterns that are always public, evaluated before protected ones
    pub public_paths: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let session_strategy = env::var("SESSION_STRATEGY")
            .ok()
            .map(|v| v.parse::<SessionStrategy>())
            .transpose()?
            .unwrap_or(SessionStrategy::Database);

        let database_url = env::var("DATABASE_URL").ok();
        if session_strategy == SessionStrategy::Database && database_url.is_none() {
            bail!("DATABASE_URL must be set when SESSION_STRATEGY is database");
        }

        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            database_url,
            session_secret: env::var("SESSION_SECRET").context("SESSION_SECRET must be set")?,
            session_expiry: env::var("SESSION_EXPIRY")
                .ok()
                .map(|v| parse_session_expiry(&v))
                .transpose()?
                .unwrap_or(2_592_000), // 30 days
            session_cookie_name: env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| "kidari.session-token".into()),
            session_strategy,
            landing_path: env::var("AUTH_LANDING_PATH").unwrap_or_else(|_| "/".into()),
            protected_paths: env::var("PROTECTED_PATHS")
                .map(|s| parse_path_list(&s))
                .unwrap_or_else(|_| vec!["/profile/:path*".into()]),
            public_paths: env::var("PUBLIC_PATHS")
                .map(|s| parse_path_list(&s))
                .unwrap_or_default(),
        })
    }

    /// Build the edge gate from the configured path lists.
    ///
    /// Public patterns come first so they can carve exceptions out of
    /// broader protected patterns.
    pub fn gate(&self) -> Result<EdgeGate, PatternError> {
        let public = self
            .public_paths
            .iter()
            .map(|p| PathPattern::parse(p).map(|pattern| GateRule::new(pattern, Access::Public)));
        let protected = self
            .protected_paths
            .iter()
            .map(|p| {
                PathPattern::parse(p).map(|pattern| GateRule::new(pattern, Access::Authenticated))
            });

        let rules = public.chain(protected).collect::<Result<Vec<_>, _>>()?;
        let gate = EdgeGate::new(rules, self.landing_path.clone());

        let landing = self
            .landing_path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        if gate.classify(landing) == Some(Access::Authenticated) {
            return Err(PatternError::ProtectedLanding(self.landing_path.clone()));
        }

        Ok(gate)
    }

    /// Create a default configuration for testing.
    ///
    /// Uses the stateless JWT strategy so no database is needed.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".into(),
            database_url: None,
            session_secret: "test-secret".into(),
            session_expiry: 3600,
            session_cookie_name: "kidari.session-token".into(),
            session_strategy: SessionStrategy::Jwt,
            landing_path: "/".into(),
            protected_paths: vec!["/profile/:path*".into()],
            public_paths: Vec::new(),
        }
    }
}

/// Longest accepted session lifetime (one year).
const MAX_SESSION_EXPIRY: i64 = 365 * 24 * 60 * 60;

/// Parse `SESSION_EXPIRY`: whole seconds in `1..=MAX_SESSION_EXPIRY`.
fn parse_session_expiry(value: &str) -> Result<i64> {
    let seconds: i64 = value
        .trim()
        .parse()
        .with_context(|| format!("SESSION_EXPIRY is not a number of seconds: {value}"))?;
    if !(1..=MAX_SESSION_EXPIRY).contains(&seconds) {
        bail!("SESSION_EXPIRY must be between 1 and {MAX_SESSION_EXPIRY} seconds, got {seconds}");
    }
    Ok(seconds)
}

/// Split a comma-separated list, dropping blanks.
fn parse_path_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
