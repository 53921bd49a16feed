#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use taskops_server::handler::routes;
use taskops_server::middleware::{RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt};
use taskops_server::service::ServiceState;

use crate::config::Cli;

pub const TRACING_TARGET_SERVER_STARTUP: &str = "taskops_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "taskops_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "taskops_cli::config";

#[tokio::main]
async fn main() {
    let code = match run().await {
        Ok(()) => {
            tracing::info!(target: TRACING_TARGET_SERVER_SHUTDOWN, "server stopped");
            0
        }
        // Tracing may not be initialized if the failure happened early.
        Err(error) if !tracing::enabled!(tracing::Level::ERROR) => {
            eprintln!("taskops: {error:#}");
            1
        }
        Err(error) => {
            tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error = %format!("{error:#}"),
                "server exited with an error"
            );
            1
        }
    };

    process::exit(code);
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();
    cli.init_tracing();
    cli.log();
    cli.validate()?;

    let state = ServiceState::from_config(&cli.service)
        .await
        .context("could not initialize the service")?;
    let app = create_router(state, &cli.recovery);

    server::serve(app, &cli.server).await.map_err(|error| {
        if let Some(hint) = error.suggestion() {
            tracing::warn!(target: TRACING_TARGET_SERVER_STARTUP, hint, "startup failed");
        }
        error.into()
    })
}

/// Routes wrapped in observability, then recovery as the outermost layer.
fn create_router(state: ServiceState, recovery: &RecoveryConfig) -> Router {
    routes(state.clone())
        .with_state(state)
        .with_observability()
        .with_recovery(recovery)
}
