//! Hire My Printer poller daemon
//!
//! Stands in for the printer server plugin: reads its settings from the
//! environment, runs the poller and shuts it down cleanly on Ctrl-C.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hmp_poller::{Config, Lifecycle};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hmp_poller=info,hmp_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Hire My Printer poller");

    // Load configuration
    let config = load_config()?;
    info!(
        "Loaded configuration: server={}, poll_interval={:?}, uploads_dir={}",
        config.server(),
        config.settings.poll_interval,
        config.uploads_dir.display()
    );

    tokio::fs::create_dir_all(&config.uploads_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create uploads directory {}",
                config.uploads_dir.display()
            )
        })?;

    let lifecycle = Lifecycle::new(config);
    lifecycle.on_startup().await?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Shutdown signal received");
    lifecycle.on_shutdown().await;

    Ok(())
}

/// Loads configuration from environment variables
fn load_config() -> Result<Config> {
    let config = Config::from_env();
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
