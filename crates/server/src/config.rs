// ABOUTME: Server configuration: bind address, backend choice, and scrape timing knobs.
// ABOUTME: Loads from TOML with per-field defaults; the PORT env var overrides the port.

//! Configuration loading for the server.
//!
//! Every field has a default, so the server runs with no config file at
//! all. Deployment platforms that inject a `PORT` environment variable win
//! over the configured port.

use std::path::Path;
use std::time::Duration;

use prensa_extractor::{ScrapeOptions, SessionConfig};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Configuration loading failures. Startup-fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Which rendering backend the server drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Plain HTTP fetch, no script execution.
    #[default]
    Http,
    /// Headless Chromium. Requires a build with the `browser` feature.
    Chromium,
}

/// Server configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port. The PORT environment variable takes precedence.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Rendering backend: "http" or "chromium".
    #[serde(default)]
    pub backend: BackendKind,

    /// User agent presented to target sites.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Rendering attempts per URL.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Page-load timeout in seconds.
    #[serde(default = "default_page_load_timeout_secs")]
    pub page_load_timeout_secs: u64,

    /// Settle sleep in seconds for sites without a wait hint.
    /// Defaults per backend: 0 for http, 15 for chromium.
    #[serde(default)]
    pub settle_delay_secs: Option<u64>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_user_agent() -> String {
    prensa_extractor::render::DEFAULT_USER_AGENT.to_string()
}

fn default_max_retries() -> u32 {
    2
}

fn default_page_load_timeout_secs() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
            backend: BackendKind::default(),
            user_agent: default_user_agent(),
            max_retries: default_max_retries(),
            page_load_timeout_secs: default_page_load_timeout_secs(),
            settle_delay_secs: None,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Applies environment overrides. Unparsable values are ignored with a
    /// warning.
    pub fn apply_env(mut self) -> Self {
        if let Ok(port) = std::env::var("PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => warn!(value = %port, "ignoring unparsable PORT"),
            }
        }
        self
    }

    /// The full bind address (host:port).
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settle delay to apply, defaulting per backend: browsers need time
    /// for scripts, plain fetches do not.
    pub fn settle_delay(&self) -> Duration {
        let secs = self.settle_delay_secs.unwrap_or(match self.backend {
            BackendKind::Http => 0,
            BackendKind::Chromium => 15,
        });
        Duration::from_secs(secs)
    }

    /// Orchestrator options derived from this configuration.
    pub fn scrape_options(&self) -> ScrapeOptions {
        ScrapeOptions {
            max_retries: self.max_retries,
            page_load_timeout: Duration::from_secs(self.page_load_timeout_secs),
            settle_delay: self.settle_delay(),
            session: SessionConfig::default().with_user_agent(self.user_agent.clone()),
            ..ScrapeOptions::default()
        }
    }
}
