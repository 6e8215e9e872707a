//! Service-level and configuration errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("server failed: {message}")]
    ServerFailed { message: String },

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {message}")]
    Invalid { message: String },

    #[error("configuration parsing failed: {0}")]
    Parsing(#[from] config::ConfigError),
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
