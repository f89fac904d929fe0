//! Host lifecycle hooks
//!
//! The host (a printer server plugin, or the bundled daemon) owns the
//! settings and calls these hooks; the poller only reacts to them.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::{Config, Settings, effective_server};
use crate::repository::ApiOrderRepository;
use crate::scheduler::PollWorker;

/// Entry points the host calls on startup, settings changes and shutdown
#[derive(Debug)]
pub struct Lifecycle {
    settings: Mutex<Settings>,
    server_override: Option<String>,
    worker: PollWorker,
}

impl Lifecycle {
    /// Creates the poller from its configuration. Nothing runs until
    /// [`Lifecycle::on_startup`].
    ///
    /// Must be called within a Tokio runtime.
    pub fn new(config: Config) -> Self {
        Self {
            settings: Mutex::new(config.settings),
            server_override: config.server_override,
            worker: PollWorker::new(config.uploads_dir),
        }
    }

    /// The poll worker driven by these hooks
    pub fn worker(&self) -> &PollWorker {
        &self.worker
    }

    /// Current settings
    pub async fn settings(&self) -> Settings {
        self.settings.lock().await.clone()
    }

    /// Starts polling if an API key is configured
    pub async fn on_startup(&self) -> Result<()> {
        info!("Hire My Printer enabled");

        let settings = self.settings().await;
        if settings.api_key.is_some() {
            info!("API key found. Starting poll worker");
            self.configure(&settings).await
        } else {
            info!("API key not found");
            Ok(())
        }
    }

    /// Applies newly saved settings
    ///
    /// When the settings carry an API key, the repository is re-created with
    /// it and the worker is started if it is not running. A server override
    /// from the configuration still wins over the saved server. A running worker
    /// keeps its interval until it is restarted.
    pub async fn on_settings_saved(&self, settings: Settings) -> Result<()> {
        settings.validate().context("Rejected settings")?;
        *self.settings.lock().await = settings.clone();

        if settings.api_key.is_some() {
            self.configure(&settings).await
        } else {
            info!("Settings saved without an API key, poll worker left as is");
            Ok(())
        }
    }

    /// Stops polling and waits for background work to complete
    pub async fn on_shutdown(&self) {
        info!("Shutting down, waiting for background work to complete");
        self.worker.shutdown().await;
    }

    async fn configure(&self, settings: &Settings) -> Result<()> {
        let Some(api_key) = settings.api_key.as_deref() else {
            return Ok(());
        };

        let server = effective_server(self.server_override.as_deref(), settings);
        let repository = ApiOrderRepository::new(server, api_key)
            .context("Failed to create order repository")?;
        self.worker.set_repository(Arc::new(repository));

        self.worker
            .start(settings.poll_interval)
            .await
            .context("Failed to start poll worker")?;

        Ok(())
    }
}
