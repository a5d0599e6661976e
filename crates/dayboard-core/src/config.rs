use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::error::{FieldViolation, ValidationError};

/// Result of config validation. Warnings are tolerated, errors are not.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: ValidationError,
    pub warnings: Vec<FieldViolation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(FieldViolation {
            field: field.into(),
            message: message.into(),
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP service settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Settings for clients talking to the service.
    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8008
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dayboard")
        .join("dayboard.db3")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_path: default_database_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the Dayboard API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    format!("http://localhost:{}", default_port())
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating the default if it doesn't
    /// exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it, logging warnings.
    pub fn load_validated() -> Result<Self> {
        let config = Self::load()?;
        let report = config.validate();

        if !report.is_valid() {
            anyhow::bail!("Configuration validation failed: {}", report.errors);
        }

        for warning in &report.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(config)
    }

    /// Validate the configuration, collecting every problem.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        if self.server.port == 0 {
            report.add_error("server.port", "Port cannot be 0");
        }

        if self.server.database_path.as_os_str().is_empty() {
            report.add_error("server.database_path", "Database path cannot be empty");
        }

        match Url::parse(&self.client.api_url) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    report.add_error(
                        "client.api_url",
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }
                if url.host().is_none() {
                    report.add_error("client.api_url", "URL must have a host");
                }
            }
            Err(e) => {
                report.add_error("client.api_url", format!("Invalid URL: {}", e));
            }
        }

        if self.server.host != "127.0.0.1" && self.server.host != "localhost" {
            report.add_warning(
                "server.host",
                "Binding a non-loopback interface exposes the API without authentication",
            );
        }

        report
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Path to the configuration file.
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("dayboard");

        Ok(config_dir.join("config.toml"))
    }
}
