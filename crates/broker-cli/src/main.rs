use broker_cli::run_cli;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "broker_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run_cli().await {
        error!("CLI error: {}", e);

        let exit_code = match e {
            broker_cli::CliError::Configuration(_) => 1,
            broker_cli::CliError::Service(_) => 2,
            broker_cli::CliError::HealthCheckFailed { .. } => 3,
            broker_cli::CliError::Io(_) => 4,
        };

        std::process::exit(exit_code);
    }
}
