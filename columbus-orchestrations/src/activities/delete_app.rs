//! Tear down the deployment, service and ingress of an instance

use columbus_models::{DeleteOutcome, StopReport};
use tracing::{info, warn};

use crate::error::ClusterError;
use crate::k8s_client::ClusterClient;
use crate::types::ResourceKind;

/// Each deletion is attempted regardless of how the others went
pub async fn delete_app(client: &dyn ClusterClient, name: &str) -> StopReport {
    let deployment = outcome(ResourceKind::Deployment, name, client.delete_deployment(name).await);
    let service = outcome(ResourceKind::Service, name, client.delete_service(name).await);
    let ingress = outcome(ResourceKind::Ingress, name, client.delete_ingress(name).await);

    StopReport {
        instance: name.to_string(),
        deployment,
        service,
        ingress,
    }
}

fn outcome(kind: ResourceKind, name: &str, result: Result<(), ClusterError>) -> DeleteOutcome {
    match result {
        Ok(()) => {
            info!(kind = %kind, name = %name, "Deleted");
            DeleteOutcome::Deleted
        }
        Err(ClusterError::NotFound { .. }) => {
            info!(kind = %kind, name = %name, "Not found, skipping");
            DeleteOutcome::Missing
        }
        Err(e) => {
            warn!(kind = %kind, name = %name, error = %e, "Deletion failed");
            DeleteOutcome::Failed { message: e.to_string() }
        }
    }
}
