//! Fixed names the launcher stamps onto instance resources

use columbus_models::InstanceKey;

use crate::types::{IngressHostMode, LauncherSettings};

/// Environment variables injected into the application container
pub mod env {
    pub const USERNAME: &str = "COLUMBUS_USERNAME";
    pub const CLIENT_ID: &str = "COLUMBUS_CLIENT_ID";
    pub const CLIENT_SECRET: &str = "COLUMBUS_CLIENT_SECRET";
}

/// Label joining the deployment, its pods and the service selector
pub const NAME_LABEL: &str = "name";

/// Where the storage claim is mounted inside the container
pub const STORAGE_MOUNT_PATH: &str = "/storage";

/// Phase a storage claim reports once a volume is attached to it
pub const BOUND_PHASE: &str = "Bound";

/// Ingress path for an instance. The second capture group is what the
/// rewrite annotation forwards to the container.
pub fn ingress_path(key: &InstanceKey) -> String {
    format!("/app/{}/{}(/|$)(.*)", key.username, key.app_name)
}

pub fn ingress_host(key: &InstanceKey, settings: &LauncherSettings) -> String {
    match settings.ingress_host_mode {
        IngressHostMode::Shared => settings.ingress_host.clone(),
        IngressHostMode::PerApp => format!("{}.{}", key.app_name, settings.ingress_host),
    }
}
