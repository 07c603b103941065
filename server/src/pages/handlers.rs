//! Page Handlers

use axum::Json;
use kd_common::{Role, Session};
use serde::Serialize;

use crate::auth::{GuardError, RequestSession};

/// Unauthenticated members are sent back to the landing page.
const MEMBER_FALLBACK: &str = "/";

/// Members poking at the notice editor go back to the notice list.
const NOTICE_FALLBACK: &str = "/notice";

/// Profile page payload.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub session: Session,
    /// Whether name and phone have been filled in.
    pub profile_complete: bool,
}

/// Profile setup payload.
#[derive(Debug, Serialize)]
pub struct ProfileSetupView {
    pub session: Session,
    /// Profile fields still missing.
    pub missing: Vec<&'static str>,
}

/// Notice editor payload.
#[derive(Debug, Serialize)]
pub struct NoticeEditorView {
    pub author: Session,
}

/// Activity management payload.
#[derive(Debug, Serialize)]
pub struct ActivitiesView {
    pub manager: Session,
}

fn missing_profile_fields(session: &Session) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if session.name.as_deref().is_none_or(str::is_empty) {
        missing.push("name");
    }
    if session.phone.as_deref().is_none_or(str::is_empty) {
        missing.push("phone");
    }
    missing
}

/// GET /profile
pub async fn profile(session: RequestSession) -> Result<Json<ProfileView>, GuardError> {
    let session = session.require_auth(MEMBER_FALLBACK)?;
    let profile_complete = missing_profile_fields(&session).is_empty();

    Ok(Json(ProfileView {
        session,
        profile_complete,
    }))
}

/// GET /profile/setup
pub async fn profile_setup(session: RequestSession) -> Result<Json<ProfileSetupView>, GuardError> {
    let session = session.require_auth(MEMBER_FALLBACK)?;
    let missing = missing_profile_fields(&session);

    Ok(Json(ProfileSetupView { session, missing }))
}

/// GET /notice/create
pub async fn notice_create(session: RequestSession) -> Result<Json<NoticeEditorView>, GuardError> {
    let author = session.require_admin(NOTICE_FALLBACK)?;
    Ok(Json(NoticeEditorView { author }))
}

/// GET /admin/activities
pub async fn admin_activities(
    session: RequestSession,
) -> Result<Json<ActivitiesView>, GuardError> {
    let manager = session.require_role(Role::Admin, MEMBER_FALLBACK)?;
    Ok(Json(ActivitiesView { manager }))
}
