use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::app::{app, AppState};
use crate::config::{AppConfig, Environment};
use crate::database::{MemoryStore, Persistence, PgPersistence};

#[derive(Parser)]
#[command(name = "lizard-api")]
#[command(about = "Account CRUD service with filtered queries and bearer-token auth")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply the schema, then serve HTTP (default)")]
    Serve {
        #[arg(long, help = "Listen port (overrides PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Apply the schema and exit")]
    Migrate,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;
    info!("Starting {} in {:?} mode", config.security.app_name, config.environment);

    let store = open_store(&config).await?;

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Migrate => store.migrate().await.context("migration failed"),
        Commands::Serve { port } => {
            store.migrate().await.context("migration failed")?;
            serve(config, store, port).await
        }
    }
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn Persistence>> {
    if config.environment == Environment::Test {
        info!("Using in-memory storage");
        return Ok(Arc::new(MemoryStore::new()));
    }
    let store = PgPersistence::connect(&config.database).await.context("failed to connect to database")?;
    Ok(Arc::new(store))
}

async fn serve(config: AppConfig, store: Arc<dyn Persistence>, port: Option<u16>) -> anyhow::Result<()> {
    let bind_addr = format!("0.0.0.0:{}", port.unwrap_or(config.server.port));
    let state = AppState::new(config, store).context("failed to initialise credential protection")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).with_graceful_shutdown(shutdown_signal()).await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
