//! Cadenza Server - Bootstrap Entry Point
//!
//! Connects to the database, applies migrations, reconciles the canonical
//! roles, and backfills self-follow edges. The HTTP front end runs as a
//! separate process and consumes this crate as a library.

use anyhow::Result;
use tracing::info;

use cadenza_server::{config, db, permissions, social};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadenza_server=info".into()),
        )
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Cadenza bootstrap");

    // Initialize database
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    // Seed canonical roles; safe to run on every startup
    permissions::reconcile_roles(&pool, permissions::DEFAULT_ROLE_TABLE, &config.default_role)
        .await?;

    // Users created before the self-follow invariant gain their edge here
    let backfilled = social::ensure_self_follows(&pool).await?;
    info!(edges = backfilled, "Self-follow backfill complete");

    Ok(())
}
