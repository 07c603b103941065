//! Authentication and Session Gating
//!
//! Session tokens, session resolution, the edge gate and the route guards.
//! The OAuth handshake itself happens at the identity providers; this module
//! starts from the session token their callback issues.

mod error;
pub mod gate;
pub mod guard;
mod handlers;
pub mod jwt;
mod middleware;
pub mod session;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::AppState;

pub use error::{GuardError, ResolveError, TokenError};
pub use gate::{Access, EdgeGate, GateDecision, GateRule, PathPattern, PatternError};
pub use guard::{
    redirect_location, require_admin, require_auth, require_role, AuthTrigger, RequestSession,
};
pub use middleware::edge_gate;
pub use session::{
    extract_session_token, resolve_request_session, ClaimsSessionResolver, PgSessionResolver,
    ResolvedSession, SessionResolver,
};

/// Create authentication router.
///
/// - GET /session - Current session (or null)
/// - POST /signout - Clear the session cookie
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session", get(handlers::get_session))
        .route("/signout", post(handlers::sign_out))
}
