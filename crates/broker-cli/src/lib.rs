//! # VerniyMQ CLI
//!
//! Command-line interface: start the broker, inspect resolved configuration,
//! and run a thin wire-protocol health check against a running instance.

use broker_protocol::{AuthFrame, Command, HeaderFrame, ResponseHeader, ResponseResult};
use broker_service::auth::{Authenticator, DisabledAuthenticator, StaticAuthenticator};
use broker_service::config::BrokerConfig;
use broker_service::errors::{ConfigError as ServiceConfigError, ServiceError};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{error, info};

/// VerniyMQ command-line interface
#[derive(Parser)]
#[command(name = "verniy-mq")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Multi-tenant in-memory message broker")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "VERNIYMQ_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the TCP broker and admin HTTP server
    Start {
        /// Host to bind the TCP listener
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to bind the TCP listener
        #[arg(short, long, default_value = "7070")]
        port: u16,

        /// Port to bind the admin HTTP server
        #[arg(long, default_value = "8080")]
        admin_port: u16,

        /// Bypass credential checking; every connection is the fixed test tenant
        #[arg(long)]
        disable_auth: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Health check commands
    Health {
        #[command(subcommand)]
        action: HealthCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Load and print the resolved configuration
    Show {
        /// Configuration file to load
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum HealthCommands {
    /// Authenticate and send a Ping, reporting success or failure
    Check {
        /// Broker host
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Broker TCP port
        #[arg(short, long, default_value = "7070")]
        port: u16,

        /// Account id to authenticate with
        #[arg(long, default_value = "")]
        account_id: String,

        /// Password to authenticate with
        #[arg(long, default_value = "")]
        password: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ServiceConfigError),

    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    #[error("health check failed: {message}")]
    HealthCheckFailed { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub async fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            host,
            port,
            admin_port,
            disable_auth,
        } => execute_start(cli.config.as_deref(), host, port, admin_port, disable_auth).await,
        Commands::Config { action } => execute_config(action).await,
        Commands::Health { action } => execute_health(action).await,
    }
}

async fn execute_start(
    config_file: Option<&std::path::Path>,
    host: String,
    port: u16,
    admin_port: u16,
    disable_auth: bool,
) -> Result<(), CliError> {
    let mut config = BrokerConfig::load(config_file.and_then(|p| p.to_str()))?;
    config.tcp.host = host;
    config.tcp.port = port;
    config.admin_http.port = admin_port;
    config.auth.disable_auth = disable_auth || config.auth.disable_auth;

    let authenticator: Arc<dyn Authenticator> = if config.auth.disable_auth {
        info!("authentication disabled for this run");
        Arc::new(DisabledAuthenticator)
    } else {
        Arc::new(StaticAuthenticator::new(
            std::env::var("VERNIYMQ_ACCOUNT_ID").unwrap_or_default(),
            std::env::var("VERNIYMQ_PASSWORD").unwrap_or_default(),
        ))
    };

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    broker_service::run(config, authenticator, shutdown)
        .await
        .map_err(CliError::Service)
}

async fn execute_config(action: ConfigCommands) -> Result<(), CliError> {
    match action {
        ConfigCommands::Show { file } => {
            let config = BrokerConfig::load(file.as_deref().and_then(|p| p.to_str()))?;
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| CliError::HealthCheckFailed { message: e.to_string() })?;
            println!("{rendered}");
            Ok(())
        }
    }
}

async fn execute_health(action: HealthCommands) -> Result<(), CliError> {
    match action {
        HealthCommands::Check {
            host,
            port,
            account_id,
            password,
        } => {
            match ping(&host, port, &account_id, &password).await {
                Ok(()) => {
                    println!("OK: broker at {host}:{port} is reachable and responding to Ping");
                    Ok(())
                }
                Err(message) => {
                    error!(host = %host, port = port, error = %message, "health check failed");
                    Err(CliError::HealthCheckFailed { message })
                }
            }
        }
    }
}

/// Authenticate then send a single `Ping`, returning `Ok` only on an `OK`
/// response. A thin, from-the-outside exercise of the wire codec.
async fn ping(host: &str, port: u16, account_id: &str, password: &str) -> Result<(), String> {
    let mut stream = TcpStream::connect((host, port))
        .await
        .map_err(|e| format!("connect failed: {e}"))?;

    let auth = AuthFrame {
        account_id: account_id.to_string(),
        password: password.to_string(),
    };
    stream
        .write_all(&auth.encode())
        .await
        .map_err(|e| format!("write auth frame failed: {e}"))?;

    let mut token_bytes = [0u8; 32 * 4];
    stream
        .read_exact(&mut token_bytes)
        .await
        .map_err(|e| format!("authentication rejected: {e}"))?;
    let token = broker_protocol::codec::decode_utf32_fixed(&token_bytes, "session_token")
        .map_err(|e| format!("malformed session token: {e}"))?;

    let header = HeaderFrame {
        session_token: token,
        command: Command::Ping,
        queue_name: String::new(),
        data_size: 0,
    };
    stream
        .write_all(&header.encode())
        .await
        .map_err(|e| format!("write ping header failed: {e}"))?;

    let mut response_header = [0u8; broker_protocol::RESPONSE_HEADER_SIZE];
    stream
        .read_exact(&mut response_header)
        .await
        .map_err(|e| format!("read response header failed: {e}"))?;
    let response = ResponseHeader::decode(&response_header).map_err(|e| e.to_string())?;

    let mut body = vec![0u8; response.data_size as usize];
    stream
        .read_exact(&mut body)
        .await
        .map_err(|e| format!("read response body failed: {e}"))?;

    match response.result {
        ResponseResult::Ok => Ok(()),
        ResponseResult::Error => Err(String::from_utf8_lossy(&body).to_string()),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
