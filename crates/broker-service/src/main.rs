//! # VerniyMQ Service
//!
//! Binary entry point: loads configuration, wires up the authenticator, and
//! runs the TCP broker and admin HTTP server until `SIGINT`/`SIGTERM`.

use broker_service::auth::{Authenticator, DisabledAuthenticator, StaticAuthenticator};
use broker_service::config::BrokerConfig;
use broker_service::errors::ServiceError;
use std::env;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "broker_service=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting VerniyMQ service");

    let config_path = env::var("VERNIYMQ_CONFIG_FILE").ok();
    let config = BrokerConfig::load(config_path.as_deref()).map_err(ServiceError::Configuration)?;

    let authenticator: Arc<dyn Authenticator> = if config.auth.disable_auth {
        info!("authentication disabled; every connection is treated as the test tenant");
        Arc::new(DisabledAuthenticator)
    } else {
        let account_id = env::var("VERNIYMQ_ACCOUNT_ID").unwrap_or_default();
        let password = env::var("VERNIYMQ_PASSWORD").unwrap_or_default();
        Arc::new(StaticAuthenticator::new(account_id, password))
    };

    info!(
        tcp_host = %config.tcp.host,
        tcp_port = config.tcp.port,
        admin_port = config.admin_http.port,
        "starting listeners"
    );

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    if let Err(e) = broker_service::run(config, authenticator, shutdown).await {
        error!(error = %e, "service failed");

        let exit_code = match e {
            ServiceError::BindFailed { .. } => 1,
            ServiceError::ServerFailed { .. } => 2,
            ServiceError::Configuration(_) => 3,
        };

        std::process::exit(exit_code);
    }

    Ok(())
}
