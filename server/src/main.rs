//! Kidari Server - Main Entry Point

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use kd_server::auth::{ClaimsSessionResolver, PgSessionResolver, SessionResolver};
use kd_server::config::{Config, SessionStrategy};
use kd_server::{api, db};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kd_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        strategy = ?config.session_strategy,
        "Starting Kidari Server"
    );

    // Session resolver, owned by the application state for the process lifetime
    let sessions: Arc<dyn SessionResolver> = match config.session_strategy {
        SessionStrategy::Database => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
            let pool = db::create_pool(database_url).await?;
            db::run_migrations(&pool).await?;
            Arc::new(PgSessionResolver::new(pool, config.session_secret.clone()))
        }
        SessionStrategy::Jwt => Arc::new(ClaimsSessionResolver::new(config.session_secret.clone())),
    };

    // Build application state
    let state = api::AppState::new(config.clone(), sessions)?;

    // Build router
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");

    Ok(())
}
