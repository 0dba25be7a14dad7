//! Delete an instance's storage claim

use tracing::info;

use crate::error::ClusterError;
use crate::k8s_client::ClusterClient;

pub async fn delete_storage(client: &dyn ClusterClient, name: &str) -> Result<(), ClusterError> {
    client.delete_storage_claim(name).await?;
    info!(claim = %name, "Deleted storage claim");
    Ok(())
}
