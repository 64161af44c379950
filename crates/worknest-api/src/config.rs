//! Server configuration
//!
//! Layered with the `config` crate: an optional TOML file, then environment
//! variables prefixed `WORKNEST`, e.g. `WORKNEST__BIND_ADDR=0.0.0.0:9000`.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_PREFIX: &str = "WORKNEST";

/// Overrides the configuration file location
pub const CONFIG_PATH_VAR: &str = "WORKNEST_CONFIG";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write configuration: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub json_logs: bool,

    /// Events kept in memory before the oldest are dropped
    #[serde(default = "default_activity_log_capacity")]
    pub activity_log_capacity: usize,

    /// Create a demo workspace at startup
    #[serde(default)]
    pub seed_demo: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            log_level: default_log_level(),
            json_logs: false,
            activity_log_capacity: default_activity_log_capacity(),
            seed_demo: false,
        }
    }
}

impl ServerConfig {
    /// `$WORKNEST_CONFIG`, else `<config dir>/worknest/server.toml`
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|dir| dir.join("worknest").join("server.toml")))
    }

    /// Load from an optional TOML file, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        }
        let config: ServerConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "log_level must be one of {}, got {}",
                LOG_LEVELS.join(", "),
                self.log_level
            )));
        }
        if self.activity_log_capacity == 0 {
            return Err(ConfigError::Invalid(
                "activity_log_capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr.parse().map_err(|_| {
            ConfigError::Invalid(format!("bind_addr is not a socket address: {}", self.bind_addr))
        })
    }

    /// Write the configuration as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_activity_log_capacity() -> usize {
    10_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServerConfig::default();
        tokio_test::assert_ok!(config.validate());
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("server.toml");
        let config = ServerConfig {
            bind_addr: "0.0.0.0:9100".to_string(),
            log_level: "debug".to_string(),
            json_logs: true,
            activity_log_capacity: 50,
            seed_demo: true,
        };

        config.save(&path).unwrap();
        let loaded = ServerConfig::load(Some(&path)).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ServerConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(loaded.bind_addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let bad_addr = ServerConfig {
            bind_addr: "localhost".to_string(),
            ..Default::default()
        };
        assert!(matches!(bad_addr.validate(), Err(ConfigError::Invalid(_))));

        let bad_level = ServerConfig {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        tokio_test::assert_err!(bad_level.validate());

        let no_capacity = ServerConfig {
            activity_log_capacity: 0,
            ..Default::default()
        };
        tokio_test::assert_err!(no_capacity.validate());
    }
}
