use crate::error::ExporterError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sheepdog: SheepdogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SheepdogConfig {
    /// Name or path of the `dog` CLI
    #[serde(default = "default_dog_binary")]
    pub dog_binary: String,
    /// Sheepdog's pid file, enables process metrics when set
    #[serde(default)]
    pub pid_file: Option<PathBuf>,
    /// Upper bound on a single `dog` invocation; unset waits for the child indefinitely
    #[serde(default)]
    pub command_timeout_seconds: Option<u64>,
}

fn default_listen_address() -> String {
    "0.0.0.0:9525".to_string()
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_dog_binary() -> String {
    "dog".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            metrics_path: default_metrics_path(),
        }
    }
}

impl Default for SheepdogConfig {
    fn default() -> Self {
        Self {
            dog_binary: default_dog_binary(),
            pid_file: None,
            command_timeout_seconds: None,
        }
    }
}

impl SheepdogConfig {
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_seconds.map(Duration::from_secs)
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("SHEEPDOG_EXPORTER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Rejects settings the server cannot run with.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.server.listen_address.trim().is_empty() {
            return Err(ExporterError::Config(
                "listen address must not be empty".to_string(),
            ));
        }
        let path = &self.server.metrics_path;
        if !path.starts_with('/') || path == "/" {
            return Err(ExporterError::Config(format!(
                "metrics path must start with '/' and must not be the landing page: {:?}",
                path
            )));
        }
        if self.sheepdog.dog_binary.trim().is_empty() {
            return Err(ExporterError::Config(
                "dog binary must not be empty".to_string(),
            ));
        }
        if self.sheepdog.command_timeout_seconds == Some(0) {
            return Err(ExporterError::Config(
                "command timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
