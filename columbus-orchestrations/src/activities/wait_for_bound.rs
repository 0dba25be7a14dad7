//! Wait for a storage claim to be bound to a volume

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::LifecycleError;
use crate::k8s_client::ClusterClient;
use crate::names::BOUND_PHASE;
use crate::poll::poll_until;
use crate::types::PollPolicy;

pub async fn wait_for_bound(
    client: &dyn ClusterClient,
    name: &str,
    policy: &PollPolicy,
    cancel: &CancellationToken,
) -> Result<(), LifecycleError> {
    let waiting_for = format!("storage claim '{}' to bind", name);

    poll_until(policy, cancel, &waiting_for, move || async move {
        let claim = client.get_storage_claim(name).await?;
        let phase = claim
            .and_then(|claim| claim.status)
            .and_then(|status| status.phase);

        if phase.as_deref() == Some(BOUND_PHASE) {
            return Ok(Some(()));
        }
        debug!(claim = %name, phase = phase.as_deref().unwrap_or("Unknown"), "Storage claim not bound");
        Ok::<_, LifecycleError>(None)
    })
    .await?;

    info!(claim = %name, "Storage claim bound");
    Ok(())
}
