//! API Router and Application State
//!
//! Central routing configuration and shared state.

use axum::{http::StatusCode, middleware::from_fn_with_state, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{
    auth::{self, EdgeGate, PatternError, SessionResolver},
    config::Config,
    pages,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Session resolver, constructed at startup and injected here
    pub sessions: Arc<dyn SessionResolver>,
    /// Edge gate built from the configured path patterns
    pub gate: Arc<EdgeGate>,
}

impl AppState {
    /// Create new application state.
    ///
    /// Fails if a configured path pattern is invalid.
    pub fn new(config: Config, sessions: Arc<dyn SessionResolver>) -> Result<Self, PatternError> {
        let gate = config.gate()?;

        Ok(Self {
            config: Arc::new(config),
            sessions,
            gate: Arc::new(gate),
        })
    }
}

/// Create the main application router.
///
/// The edge gate wraps every route, so path-level checks run before any
/// handler and the resolved session is available to route guards.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Session endpoints
        .nest("/api/auth", auth::router())
        // Member and admin pages
        .merge(pages::router())
        // Unknown paths still pass through the gate
        .fallback(not_found)
        // Middleware
        .layer(from_fn_with_state(state.clone(), auth::edge_gate))
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Fallback for unrouted paths.
async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
