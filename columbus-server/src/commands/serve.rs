use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::api::{self, AppState};
use crate::config::Config;

pub async fn run_server(config: Config, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(config.server_port);
    let addr = format!("{}:{}", config.server_host, port);

    info!(
        namespace = %config.launcher.namespace,
        ingress_host = %config.launcher.ingress_host,
        "Starting Columbus launcher"
    );

    let orchestrator = super::connect(&config).await?;

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        super::shutdown_signal().await;
        info!("Shutdown signal received, draining requests");
        signal_token.cancel();
    });

    let state = AppState {
        orchestrator: Arc::new(orchestrator),
        shutdown,
    };

    api::start_server(&addr, state).await?;

    info!("✓ Server stopped");
    Ok(())
}
