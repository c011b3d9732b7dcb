//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files including bind address, bind port, and the
//! database path. Environment variables override file values so deployments
//! can inject the storage location without editing config.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Environment variable carried an unusable value
    #[error("Invalid value for {0}: {1}")]
    InvalidEnv(String, String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 3000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Path to the SQLite database file
    pub database_path: String,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

/// Default port: 3000
fn default_bind_port() -> u16 {
    3000
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;

        // Validate required fields
        if config.database_path.is_empty() {
            return Err(ConfigError::MissingField("database_path".to_string()));
        }

        Ok(config)
    }

    /// Apply environment overrides
    ///
    /// `ABACUS_DATABASE` replaces the database path and `ABACUS_PORT` the
    /// bind port. File values stay in effect when a variable is unset.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(path) = std::env::var("ABACUS_DATABASE") {
            if path.is_empty() {
                return Err(ConfigError::InvalidEnv(
                    "ABACUS_DATABASE".to_string(),
                    "empty path".to_string(),
                ));
            }
            self.database_path = path;
        }

        if let Ok(port) = std::env::var("ABACUS_PORT") {
            self.bind_port = port
                .parse()
                .map_err(|_| ConfigError::InvalidEnv("ABACUS_PORT".to_string(), port))?;
        }

        Ok(())
    }

    /// Create a default configuration for testing
    ///
    /// Uses an in-memory database so nothing touches disk.
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 3000,
            database_path: ":memory:".to_string(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
