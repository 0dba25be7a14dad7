//! Check whether an instance's deployment has an available replica

use tracing::debug;

use crate::error::ClusterError;
use crate::k8s_client::ClusterClient;

pub async fn is_running(client: &dyn ClusterClient, name: &str) -> Result<bool, ClusterError> {
    match client.get_deployment(name).await? {
        None => {
            debug!(instance = %name, "Deployment not found");
            Ok(false)
        }
        Some(deployment) => {
            let available = deployment
                .status
                .as_ref()
                .and_then(|status| status.available_replicas)
                .unwrap_or(0);
            debug!(instance = %name, available_replicas = available, "Deployment found");
            Ok(available > 0)
        }
    }
}
