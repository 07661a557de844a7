//! Eventi server
//!
//! Main entry point for the Eventi dashboard backend.

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eventi_api::{AppState, create_router};
use eventi_db::connect_with;
use eventi_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventi=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Connect to database
    let db = connect_with(&config.database).await?;
    info!("Connected to database");

    if config.auth.github.is_none() {
        warn!("AUTH_GITHUB_ID / AUTH_GITHUB_SECRET not set; no sign-in provider is available");
    }
    info!(
        base_url = %config.auth.base_url,
        public_prefixes = ?config.gate.public_prefixes,
        "Auth configured"
    );

    // Create application state
    let state = AppState::new(db, &config);

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
