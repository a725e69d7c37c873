//! File gateway - Entry Point
//!
//! Serves sandboxed file tools over newline-delimited JSON.

use log::{error, info};
use std::process::ExitCode;

use fs_gateway::utils::logging::setup_logging;
use fs_gateway::{GatewayConfig, Server};

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    info!("Launching file gateway...");

    let config = match GatewayConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let ops = match config.file_ops() {
        Ok(ops) => ops,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match Server::bind(config, ops).await {
        Ok(server) => {
            server.start().await;
            ExitCode::SUCCESS
        }
        Err(_) => ExitCode::FAILURE,
    }
}
