//! # Obras API Server
//!
//! Marketplace backend where clients post construction and repair projects,
//! providers quote on them, and both sides review each other once the work
//! is completed.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/obras JWT_SECRET=... cargo run -p obras-api
//! ```

use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;
use obras_api::{
    app::{build_router, AppState},
    config::Config,
};
use obras_shared::{
    db::{
        migrations::{ensure_database_exists, run_migrations},
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    store::postgres::PgStore,
    Marketplace,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    // JSON lines in production, human-readable otherwise
    let production = config.api.production;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "obras_api=debug,obras_shared=debug,tower_http=debug".into()
            }),
        )
        .with(production.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!production).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!("Obras API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    if !production {
        ensure_database_exists(&config.database.url)
            .await
            .context("Failed to create development database")?;
    }

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await
    .context("Failed to connect to database")?;

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let market = Marketplace::new(Arc::new(PgStore::new(pool.clone())), config.jwt.secret.clone())
        .with_token_lifetime(Duration::days(config.jwt.expiration_days));

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(market, config));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    close_pool(pool).await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
