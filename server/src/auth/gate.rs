//! Edge Gate
//!
//! Path-level authentication requirements checked before any handler runs.
//! Classification looks at the URL path only, never at the query string,
//! body or session contents.

use regex::Regex;
use thiserror::Error;

use super::guard::{redirect_location, AuthTrigger};

/// Invalid gate pattern.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatternError {
    /// Pattern is empty.
    #[error("Path pattern is empty")]
    Empty,

    /// Pattern does not start with `/`.
    #[error("Path pattern must start with '/': {0}")]
    NotAbsolute(String),

    /// A `:name` segment has an empty or non-identifier name.
    #[error("Invalid parameter segment '{segment}' in pattern {pattern}")]
    InvalidParameter { pattern: String, segment: String },

    /// The compiled expression was rejected.
    #[error("Path pattern {0} failed to compile")]
    Compile(String),

    /// The landing location itself requires a session.
    #[error("Landing path {0} is protected, anonymous visitors would loop")]
    ProtectedLanding(String),
}

/// URL path matcher.
///
/// Supported segments:
/// - `notice` - literal segment
/// - `:id` - exactly one segment
/// - `:path*` - zero or more segments
/// - `:path+` - one or more segments
///
/// A trailing slash on the request path is tolerated.
#[derive(Debug, Clone)]
pub struct PathPattern {
    regex: Regex,
}

impl PathPattern {
    /// Parse and compile a pattern such as `/profile/:path*`.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        if !pattern.starts_with('/') {
            return Err(PatternError::NotAbsolute(pattern.to_string()));
        }

        let mut expr = String::from("^");
        for segment in pattern.split('/').filter(|s| !s.is_empty()) {
            let Some(param) = segment.strip_prefix(':') else {
                expr.push('/');
                expr.push_str(&regex::escape(segment));
                continue;
            };

            let (name, repeat) = if let Some(name) = param.strip_suffix('*') {
                (name, Some('*'))
            } else if let Some(name) = param.strip_suffix('+') {
                (name, Some('+'))
            } else {
                (param, None)
            };

            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(PatternError::InvalidParameter {
                    pattern: pattern.to_string(),
                    segment: segment.to_string(),
                });
            }

            match repeat {
                Some(op) => {
                    expr.push_str("(?:/[^/]+)");
                    expr.push(op);
                }
                None => expr.push_str("/[^/]+"),
            }
        }
        expr.push_str("/?$");

        let regex = Regex::new(&expr).map_err(|_| PatternError::Compile(pattern.to_string()))?;

        Ok(Self { regex })
    }

    /// Whether `path` matches this pattern.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// What a matched path requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone may pass.
    Public,
    /// A valid session is required.
    Authenticated,
}

/// One `(pattern, access)` entry of the gate.
#[derive(Debug, Clone)]
pub struct GateRule {
    pub pattern: PathPattern,
    pub access: Access,
}

impl GateRule {
    #[must_use]
    pub const fn new(pattern: PathPattern, access: Access) -> Self {
        Self { pattern, access }
    }
}

/// Outcome of the gate for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Let the request through to routing.
    Allow,
    /// Answer with a redirect to this location.
    Redirect(String),
}

/// Ordered list of gate rules plus the unauthenticated landing location.
#[derive(Debug, Clone)]
pub struct EdgeGate {
    rules: Vec<GateRule>,
    landing: String,
}

impl EdgeGate {
    /// Create a gate. Rules are evaluated in order; the first match wins.
    #[must_use]
    pub const fn new(rules: Vec<GateRule>, landing: String) -> Self {
        Self { rules, landing }
    }

    /// Access requirement for `path`, `None` when no rule matches.
    #[must_use]
    pub fn classify(&self, path: &str) -> Option<Access> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(path))
            .map(|rule| rule.access)
    }

    /// Decide whether a request for `path` may proceed.
    ///
    /// `authenticated` is true only when a token resolved to a session;
    /// absent and invalid tokens are the same thing here.
    #[must_use]
    pub fn decide(&self, path: &str, authenticated: bool) -> GateDecision {
        match self.classify(path) {
            Some(Access::Authenticated) if !authenticated => GateDecision::Redirect(
                redirect_location(&self.landing, AuthTrigger::LoginRequired),
            ),
            Some(Access::Authenticated | Access::Public) | None => GateDecision::Allow,
        }
    }

    /// Unauthenticated landing location.
    #[must_use]
    pub fn landing(&self) -> &str {
        &self.landing
    }
}
