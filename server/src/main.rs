//! Subdeck server binary.
//!
//! Opens the database, loads configuration, and runs the axum web server
//! until interrupted.

mod app;
mod config;
mod reconcile;
mod server;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Subdeck");

    let config = config::AppConfig::load();
    std::fs::create_dir_all(&config.data_dir)?;

    let db_path = config.data_dir.join("subscriptions.db");
    tracing::info!("Opening database at {}", db_path.display());
    let db = subs_db::Database::open(&db_path)?;

    let state = app::SharedState::new(db, config);
    server::start_server(state).await?;

    tracing::info!("Shutting down...");
    Ok(())
}
