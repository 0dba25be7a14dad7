//! Start an application instance
//!
//! Order: storage claim -> wait for bind -> deployment -> service -> ingress.
//! Steps that already committed are never rolled back; a failed service or
//! ingress leaves the instance partially provisioned and is reported as such.

use std::time::Instant;

use columbus_models::{InstanceSpec, StartReport};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::LifecycleOrchestrator;
use crate::activities::deploy_app::deploy_app;
use crate::activities::ensure_storage::ensure_storage;
use crate::activities::expose_app::{expose_ingress, expose_service};
use crate::activities::wait_for_bound::wait_for_bound;
use crate::error::LifecycleError;

impl LifecycleOrchestrator {
    /// Provision every resource of an instance unless it is already running.
    ///
    /// Blocks until the storage claim is bound and the deployment has been
    /// accepted; both waits are bounded by the configured poll policies and
    /// end early when `cancel` fires.
    pub async fn start(
        &self,
        mut spec: InstanceSpec,
        cancel: &CancellationToken,
    ) -> Result<StartReport, LifecycleError> {
        let started = Instant::now();
        let name = spec.key.resource_name();

        if self.is_running(&spec.key).await? {
            info!(instance = %name, "Instance already running, nothing to do");
            return Ok(StartReport::already_running(name));
        }

        if !self.settings.forward_credentials {
            spec.credentials = None;
        }

        info!(instance = %name, image = %spec.image_path, "Starting application instance");
        let client = self.cluster();

        // Step 1: storage outlives stop, so it may already be there
        let storage = ensure_storage(client, &spec.key, &self.settings).await?;

        // Step 2: pods cannot mount the claim before it is bound
        wait_for_bound(client, &name, &self.settings.bind_wait, cancel).await?;

        // Step 3: deployment
        let deployment = deploy_app(client, &spec, &self.settings, cancel).await?;

        // Step 4: network exposure (best effort)
        let service = expose_service(client, &spec.key, &self.settings).await;
        let ingress = expose_ingress(client, &spec.key, &self.settings).await;

        let report = StartReport {
            instance: name,
            storage,
            deployment,
            service,
            ingress,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        if report.is_complete() {
            info!(instance = %report.instance, elapsed_ms = report.elapsed_ms, "Instance started");
        } else {
            warn!(instance = %report.instance, "Instance started with failures: {:?}", report);
        }

        Ok(report)
    }
}
