//! Authentication Handlers

use axum::{extract::State, response::Redirect, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use kd_common::Session;

use super::guard::RequestSession;
use crate::api::AppState;

/// Current session, or `null` when the visitor is not signed in.
///
/// GET /api/auth/session
pub async fn get_session(session: RequestSession) -> Json<Option<Session>> {
    Json(session.into_inner())
}

/// Clear the session cookie and send the visitor to the landing page.
///
/// POST /api/auth/signout
pub async fn sign_out(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.remove(Cookie::build((state.config.session_cookie_name.clone(), "")).path("/"));

    (jar, Redirect::to(state.gate.landing()))
}
