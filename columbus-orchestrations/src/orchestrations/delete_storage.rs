//! Delete an instance's storage claim

use columbus_models::InstanceKey;
use tracing::info;

use super::LifecycleOrchestrator;
use crate::activities::delete_storage::delete_storage;
use crate::error::LifecycleError;

impl LifecycleOrchestrator {
    /// Delete the storage claim of an instance. Unlike [`Self::stop`], every
    /// failure is returned, including a claim that does not exist.
    pub async fn delete_storage(&self, key: &InstanceKey) -> Result<(), LifecycleError> {
        key.validate()?;
        let name = key.resource_name();
        info!(instance = %name, "Deleting instance storage");
        delete_storage(self.cluster(), &name).await?;
        Ok(())
    }
}
