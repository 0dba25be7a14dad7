//! Stop an application instance. The storage claim is kept so a later start
//! picks the data back up.

use columbus_models::{InstanceKey, StopReport};
use tracing::{info, warn};

use super::LifecycleOrchestrator;
use crate::activities::delete_app::delete_app;
use crate::error::LifecycleError;

impl LifecycleOrchestrator {
    /// Request foreground deletion of the deployment, service and ingress.
    /// Only an invalid key fails; per-resource problems are recorded in the
    /// report.
    pub async fn stop(&self, key: &InstanceKey) -> Result<StopReport, LifecycleError> {
        key.validate()?;
        let name = key.resource_name();
        info!(instance = %name, "Stopping application instance");

        let report = delete_app(self.cluster(), &name).await;
        if report.has_failures() {
            warn!(instance = %name, "Instance stopped with failures: {:?}", report);
        }
        Ok(report)
    }
}
