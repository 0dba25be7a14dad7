//! Lifecycle orchestrations for application instances
//!
//! The orchestrator keeps no state between calls: every decision re-reads the
//! cluster, which stays the only source of truth for an instance.

use std::sync::Arc;

use crate::k8s_client::ClusterClient;
use crate::types::LauncherSettings;

mod app_status;
mod delete_storage;
mod start_app;
mod stop_app;

/// Entry point for starting, stopping and inspecting application instances
#[derive(Clone)]
pub struct LifecycleOrchestrator {
    client: Arc<dyn ClusterClient>,
    settings: LauncherSettings,
}

impl LifecycleOrchestrator {
    pub fn new(client: Arc<dyn ClusterClient>, settings: LauncherSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &LauncherSettings {
        &self.settings
    }

    /// The underlying cluster client
    pub fn cluster(&self) -> &dyn ClusterClient {
        self.client.as_ref()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::time::Duration;

    use k8s_openapi::api::apps::v1::{Deployment, DeploymentStatus};
    use k8s_openapi::api::core::v1::{PersistentVolumeClaim, PersistentVolumeClaimStatus};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    use crate::types::{LauncherSettings, PollPolicy};

    pub fn fast_settings() -> LauncherSettings {
        let fast = PollPolicy {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            multiplier: 2.0,
            timeout: Duration::from_secs(5),
        };
        LauncherSettings {
            bind_wait: fast.clone(),
            conflict_retry: fast,
            ..Default::default()
        }
    }

    pub fn claim(name: &str, phase: &str) -> PersistentVolumeClaim {
        PersistentVolumeClaim {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            status: Some(PersistentVolumeClaimStatus {
                phase: Some(phase.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn deployment(name: &str, available_replicas: Option<i32>) -> Deployment {
        Deployment {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            status: Some(DeploymentStatus {
                available_replicas,
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}
