//! Create the instance deployment, riding out a previous deployment that is
//! still terminating

use columbus_models::{InstanceSpec, ResourceOutcome};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::{ClusterError, LifecycleError};
use crate::k8s_client::ClusterClient;
use crate::manifests;
use crate::poll::poll_until;
use crate::types::LauncherSettings;

pub async fn deploy_app(
    client: &dyn ClusterClient,
    spec: &InstanceSpec,
    settings: &LauncherSettings,
    cancel: &CancellationToken,
) -> Result<ResourceOutcome, LifecycleError> {
    let deployment = manifests::deployment(spec, settings)?;
    let deployment = &deployment;
    let name = spec.key.resource_name();
    let waiting_for = format!("deployment '{}' to finish terminating", name);

    let outcome = poll_until(&settings.conflict_retry, cancel, &waiting_for, move || async move {
        match client.create_deployment(deployment).await {
            Ok(_) => Ok(Some(ResourceOutcome::Created)),
            Err(ClusterError::BeingDeleted { .. }) => Ok(None),
            Err(ClusterError::AlreadyExists { .. }) => Ok(Some(ResourceOutcome::Existing)),
            Err(e) => Err(LifecycleError::from(e)),
        }
    })
    .await?;

    info!(deployment = %name, image = %spec.image_path, outcome = ?outcome, "Deployment submitted");
    Ok(outcome)
}
