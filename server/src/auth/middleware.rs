//! Edge Gate Middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use super::gate::GateDecision;
use super::session::{resolve_request_session, ResolvedSession};
use crate::api::AppState;

/// Middleware enforcing path-level authentication.
///
/// Resolves the request's session once (when a token is present), asks the
/// edge gate for a decision and either redirects or forwards the request with
/// the resolved session in its extensions for the route guards.
///
/// # Usage
///
/// ```ignore
/// Router::new()
///     .route("/profile", get(handler))
///     .layer(axum::middleware::from_fn_with_state(state, edge_gate))
/// ```
#[tracing::instrument(skip(state, request, next))]
pub async fn edge_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let session = resolve_request_session(
        state.sessions.as_ref(),
        request.headers(),
        &state.config.session_cookie_name,
    )
    .await;

    match state.gate.decide(request.uri().path(), session.is_some()) {
        GateDecision::Allow => {
            request.extensions_mut().insert(ResolvedSession(session));
            next.run(request).await
        }
        GateDecision::Redirect(location) => {
            debug!(path = %request.uri().path(), %location, "Unauthenticated request redirected");
            Redirect::temporary(&location).into_response()
        }
    }
}
