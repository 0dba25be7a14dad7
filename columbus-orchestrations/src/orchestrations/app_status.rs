//! Liveness queries

use columbus_models::{AppStatus, InstanceKey};

use super::LifecycleOrchestrator;
use crate::activities::check_running::is_running;
use crate::error::LifecycleError;

impl LifecycleOrchestrator {
    /// True when the instance's deployment reports at least one available replica
    pub async fn is_running(&self, key: &InstanceKey) -> Result<bool, LifecycleError> {
        key.validate()?;
        Ok(is_running(self.cluster(), &key.resource_name()).await?)
    }

    pub async fn get_status(&self, key: &InstanceKey) -> Result<AppStatus, LifecycleError> {
        self.is_running(key).await.map(AppStatus::from)
    }
}
