pub mod app;
pub mod serve;

use std::sync::Arc;

use anyhow::Result;
use columbus_orchestrations::k8s_client::{get_k8s_client, KubeClusterClient};
use columbus_orchestrations::LifecycleOrchestrator;

use crate::config::Config;

/// Connect to the cluster and build an orchestrator scoped to the configured namespace
pub async fn connect(config: &Config) -> Result<LifecycleOrchestrator> {
    let client = get_k8s_client().await?;
    let cluster = KubeClusterClient::new(client, &config.launcher.namespace);

    tracing::debug!(namespace = %config.launcher.namespace, "Connected to cluster");

    Ok(LifecycleOrchestrator::new(
        Arc::new(cluster),
        config.launcher.clone(),
    ))
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
