//! Layered configuration: defaults, then an optional TOML file, then
//! `VERNIYMQ_`-prefixed environment overrides.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level broker configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BrokerConfig {
    pub tcp: TcpConfig,
    pub admin_http: AdminHttpConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

impl BrokerConfig {
    /// Load configuration from an optional file, layered under defaults and
    /// over-ridden by `VERNIYMQ_`-prefixed environment variables.
    pub fn load(file_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = file_path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix("VERNIYMQ")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

/// TCP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TcpConfig {
    pub host: String,
    pub port: u16,
    pub visibility_timeout_seconds: u64,
}

impl TcpConfig {
    pub fn visibility_timeout(&self) -> Duration {
        Duration::from_secs(self.visibility_timeout_seconds)
    }
}

impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7070,
            visibility_timeout_seconds: 60,
        }
    }
}

/// Admin HTTP surface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminHttpConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
}

impl Default for AdminHttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
        }
    }
}

/// Authentication backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// When `true`, `verify` always succeeds and the fixed test tenant id
    /// is assumed, bypassing the credential backend entirely.
    pub disable_auth: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { disable_auth: false }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
