//! Member and Admin Pages
//!
//! Page shells for the member area (profile) and the admin surface (notices,
//! volunteer activities). Each one runs its route guard first; rendering and
//! business logic live in the frontend.

mod handlers;

use axum::{routing::get, Router};

use crate::api::AppState;

pub use handlers::{ActivitiesView, NoticeEditorView, ProfileSetupView, ProfileView};

/// Create the pages router.
///
/// Member routes (session required):
/// - GET /profile
/// - GET /profile/setup
///
/// Admin routes (ADMIN role required):
/// - GET /notice/create
/// - GET /admin/activities
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(handlers::profile))
        .route("/profile/setup", get(handlers::profile_setup))
        .route("/notice/create", get(handlers::notice_create))
        .route("/admin/activities", get(handlers::admin_activities))
}
