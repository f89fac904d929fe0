//! Poller configuration
//!
//! Defines the settings the host hands to the poller (API server, API key,
//! polling cadence) and the process-wide download directory.

use std::path::PathBuf;
use std::time::Duration;

/// Default API base URL
pub const DEFAULT_SERVER: &str = "http://localhost:3000";

/// Default delay between two polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default directory downloaded print files are written to
pub const DEFAULT_UPLOADS_DIR: &str = "watched";

/// Settings owned by the host and injected on startup or when saved
///
/// The poller never mutates these; a change always arrives as a whole new
/// value through [`crate::Lifecycle::on_settings_saved`].
#[derive(Clone, PartialEq)]
pub struct Settings {
    /// Order API base URL (e.g., "http://localhost:3000")
    pub server: String,

    /// Key used as bearer token. Polling does not start until it is set.
    pub api_key: Option<String>,

    /// How often to poll the order API for pending orders
    pub poll_interval: Duration,
}

impl Settings {
    /// Validates the settings
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_server(&self.server)?;

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if matches!(&self.api_key, Some(key) if key.trim().is_empty()) {
            anyhow::bail!("api_key cannot be empty");
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            api_key: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("server", &self.server)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

/// Poller configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Settings handed to the poll worker
    pub settings: Settings,

    /// API base URL forced by the environment. Wins over any server the host
    /// saves in its settings.
    pub server_override: Option<String>,

    /// Directory downloaded print files are written to.
    /// Resolved once at startup and kept for the process lifetime.
    pub uploads_dir: PathBuf,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - HMP_API (optional, API base URL overriding the settings' server)
    /// - HMP_API_KEY (optional, polling is disabled until set)
    /// - HMP_POLL_INTERVAL (optional, seconds, default: 5)
    /// - HMP_UPLOADS_DIR (optional, default: ./watched)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_override = lookup("HMP_API").filter(|server| !server.is_empty());

        let api_key = lookup("HMP_API_KEY").filter(|key| !key.is_empty());

        let poll_interval = lookup("HMP_POLL_INTERVAL")
            .and_then(|s| s.trim().parse::<f64>().ok())
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        let uploads_dir = lookup("HMP_UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOADS_DIR));

        Self {
            settings: Settings {
                api_key,
                poll_interval,
                ..Settings::default()
            },
            server_override,
            uploads_dir,
        }
    }

    /// Server the poller talks to: the override if set, else the settings'
    pub fn server(&self) -> &str {
        effective_server(self.server_override.as_deref(), &self.settings)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        self.settings.validate()?;

        if let Some(server) = &self.server_override {
            validate_server(server)?;
        }

        if self.uploads_dir.as_os_str().is_empty() {
            anyhow::bail!("uploads_dir cannot be empty");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            server_override: None,
            uploads_dir: PathBuf::from(DEFAULT_UPLOADS_DIR),
        }
    }
}

pub(crate) fn effective_server<'a>(
    server_override: Option<&'a str>,
    settings: &'a Settings,
) -> &'a str {
    server_override.unwrap_or(&settings.server)
}

fn validate_server(server: &str) -> anyhow::Result<()> {
    if server.is_empty() {
        anyhow::bail!("server cannot be empty");
    }

    if !server.starts_with("http://") && !server.starts_with("https://") {
        anyhow::bail!("server must start with http:// or https://");
    }

    Ok(())
}
