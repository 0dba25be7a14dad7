//! Create the instance's storage claim unless one survives from an earlier run

use columbus_models::{InstanceKey, ResourceOutcome};
use tracing::info;

use crate::error::{ClusterError, LifecycleError};
use crate::k8s_client::ClusterClient;
use crate::manifests;
use crate::types::LauncherSettings;

pub async fn ensure_storage(
    client: &dyn ClusterClient,
    key: &InstanceKey,
    settings: &LauncherSettings,
) -> Result<ResourceOutcome, LifecycleError> {
    let name = key.resource_name();

    if client.get_storage_claim(&name).await?.is_some() {
        info!(claim = %name, "Reusing existing storage claim");
        return Ok(ResourceOutcome::Existing);
    }

    let claim = manifests::storage_claim(key, settings)?;
    match client.create_storage_claim(&claim).await {
        Ok(_) => {
            info!(claim = %name, size = %settings.storage_size, "Created storage claim");
            Ok(ResourceOutcome::Created)
        }
        // A concurrent start got there first
        Err(ClusterError::AlreadyExists { .. }) => {
            info!(claim = %name, "Storage claim appeared concurrently, reusing it");
            Ok(ResourceOutcome::Existing)
        }
        Err(e) => Err(e.into()),
    }
}
