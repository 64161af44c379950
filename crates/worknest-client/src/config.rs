//! Client configuration

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use worknest_http::HttpConfig;
use worknest_query::QueryConfig;

use crate::error::{ClientError, Result};

/// Environment variables override the file, e.g. `WORKNEST_CLIENT__BASE_URL`
pub const ENV_PREFIX: &str = "WORKNEST_CLIENT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root, including the `/api/v1` namespace
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How long cached query results are served without refetching
    #[serde(default = "default_stale_time_ms")]
    pub stale_time_ms: u64,

    /// Quiet period before a search term is applied
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Member id sent as the acting user; the server records `anonymous` without it
    #[serde(default)]
    pub actor: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            stale_time_ms: default_stale_time_ms(),
            debounce_ms: default_debounce_ms(),
            actor: None,
        }
    }
}

impl ClientConfig {
    /// Load from an optional TOML file, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        }
        let config: ClientConfig = builder
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

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClientError::Validation(format!(
                "base_url must be an http(s) URL, got {}",
                self.base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ClientError::Validation(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn http_config(&self) -> HttpConfig {
        let config = HttpConfig::new()
            .with_base_url(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.request_timeout_secs));
        match &self.actor {
            Some(actor) => config.with_actor(actor.clone()),
            None => config,
        }
    }

    pub fn query_config(&self) -> QueryConfig {
        QueryConfig {
            stale_time: Duration::from_millis(self.stale_time_ms),
        }
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080/api/v1".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_stale_time_ms() -> u64 {
    30_000
}

fn default_debounce_ms() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "base_url = \"http://localhost:9000/api/v1\"\ndebounce_ms = 150\nactor = \"member-3\""
        )
        .unwrap();

        let config = ClientConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.base_url, "http://localhost:9000/api/v1");
        assert_eq!(config.http_config().actor(), Some("member-3"));
        assert_eq!(config.debounce_delay(), Duration::from_millis(150));
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.stale_time_ms, 30_000);
    }

    #[test]
    fn test_validation() {
        let config = ClientConfig {
            base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ClientError::Validation(_))));

        let config = ClientConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
