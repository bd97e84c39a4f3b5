use clap::Parser;
use std::process::ExitCode;

use request_bin::cli::Cli;
use request_bin::lifecycle::startup;
use request_bin::observability::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = cli.log_level.clone().unwrap_or_else(|| "info".to_string());
    let partial_tls = cli.partial_tls();

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init(&level);
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability.log_level);
    tracing::info!("request-bin v{} starting", env!("CARGO_PKG_VERSION"));
    if partial_tls {
        tracing::warn!("Both --cert and --key are required for TLS, serving plaintext");
    }

    match startup::run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}
