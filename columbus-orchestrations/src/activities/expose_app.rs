//! Best-effort creation of the service and ingress in front of an instance.
//! Failures are reported, never propagated.

use columbus_models::{InstanceKey, ResourceOutcome};
use tracing::{info, warn};

use crate::error::{ClusterError, LifecycleError};
use crate::k8s_client::ClusterClient;
use crate::manifests;
use crate::types::{LauncherSettings, ResourceKind};

pub async fn expose_service(
    client: &dyn ClusterClient,
    key: &InstanceKey,
    settings: &LauncherSettings,
) -> ResourceOutcome {
    let result = async {
        let service = manifests::service(key, settings)?;
        client.create_service(&service).await?;
        Ok::<(), LifecycleError>(())
    }
    .await;
    outcome(ResourceKind::Service, &key.resource_name(), result)
}

pub async fn expose_ingress(
    client: &dyn ClusterClient,
    key: &InstanceKey,
    settings: &LauncherSettings,
) -> ResourceOutcome {
    let result = async {
        let ingress = manifests::ingress(key, settings)?;
        client.create_ingress(&ingress).await?;
        Ok::<(), LifecycleError>(())
    }
    .await;
    outcome(ResourceKind::Ingress, &key.resource_name(), result)
}

fn outcome(kind: ResourceKind, name: &str, result: Result<(), LifecycleError>) -> ResourceOutcome {
    match result {
        Ok(()) => {
            info!(kind = %kind, name = %name, "Created");
            ResourceOutcome::Created
        }
        Err(LifecycleError::Cluster(ClusterError::AlreadyExists { .. })) => {
            info!(kind = %kind, name = %name, "Already exists");
            ResourceOutcome::Existing
        }
        Err(e) => {
            warn!(kind = %kind, name = %name, error = %e, "Creation failed, instance left partially provisioned");
            ResourceOutcome::Failed { message: e.to_string() }
        }
    }
}
