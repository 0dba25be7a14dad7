use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest Kubernetes label; bounds the derived volume name
const MAX_NAME_LEN: usize = 63;

/// An `(appName, username)` pair that cannot name cluster resources
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field} '{value}': {reason}")]
pub struct InvalidInstanceKey {
    pub field: &'static str,
    pub value: String,
    pub reason: &'static str,
}

/// Identifies one application instance: the `(appName, username)` pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct InstanceKey {
    pub app_name: String,
    pub username: String,
}

impl InstanceKey {
    /// Unchecked constructor; use [`InstanceKey::try_new`] for caller input
    pub fn new(app_name: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            username: username.into(),
        }
    }

    /// Trim and validate caller input
    pub fn try_new(app_name: &str, username: &str) -> Result<Self, InvalidInstanceKey> {
        let key = Self::new(app_name.trim(), username.trim());
        key.validate()?;
        Ok(key)
    }

    /// Check that the pair maps to exactly one resource name.
    ///
    /// The app name is lowercase alphanumeric and starts with a letter, so the
    /// first `-` of `<appName>-<username>` is always the separator. The
    /// username is a DNS-1123 label.
    pub fn validate(&self) -> Result<(), InvalidInstanceKey> {
        let invalid = |field, value: &str, reason| InvalidInstanceKey {
            field,
            value: value.to_string(),
            reason,
        };

        let app = self.app_name.as_bytes();
        if app.is_empty() {
            return Err(invalid("appName", &self.app_name, "must not be empty"));
        }
        if !app[0].is_ascii_lowercase() {
            return Err(invalid("appName", &self.app_name, "must start with a lowercase letter"));
        }
        if !app.iter().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
            return Err(invalid(
                "appName",
                &self.app_name,
                "may only contain lowercase letters and digits",
            ));
        }

        let user = self.username.as_bytes();
        if user.is_empty() {
            return Err(invalid("username", &self.username, "must not be empty"));
        }
        if !user
            .iter()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == b'-')
        {
            return Err(invalid(
                "username",
                &self.username,
                "may only contain lowercase letters, digits and '-'",
            ));
        }
        if user[0] == b'-' || user[user.len() - 1] == b'-' {
            return Err(invalid("username", &self.username, "must not start or end with '-'"));
        }

        let volume = self.volume_name();
        if volume.len() > MAX_NAME_LEN {
            return Err(invalid("instance name", &volume, "is longer than 63 characters"));
        }
        Ok(())
    }

    /// Name shared by the storage claim, deployment, service and ingress
    /// of this instance (`<appName>-<username>`).
    pub fn resource_name(&self) -> String {
        format!("{}-{}", self.app_name, self.username)
    }

    /// Name of the pod volume backed by the storage claim
    pub fn volume_name(&self) -> String {
        format!("{}-data", self.resource_name())
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.app_name, self.username)
    }
}

/// OAuth client credentials handed to the application container
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Everything needed to start an instance. Lives only for one start request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSpec {
    /// Container image reference (e.g. `registry/app:v1`)
    pub image_path: String,
    pub key: InstanceKey,
    /// `None` means no credential env vars are rendered into the container
    #[serde(default)]
    pub credentials: Option<Credentials>,
}

/// Binary liveness of an instance
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppStatus {
    Running,
    Missing,
}

impl From<bool> for AppStatus {
    fn from(running: bool) -> Self {
        if running {
            AppStatus::Running
        } else {
            AppStatus::Missing
        }
    }
}

/// Body of the status endpoint: `{"appStatus": "Running"}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppStatusResponse {
    #[serde(rename = "appStatus")]
    pub status: AppStatus,
}

/// What happened to one resource during a start
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ResourceOutcome {
    /// Created by this call
    Created,
    /// Already present in the cluster and reused
    Existing,
    /// Not attempted because the instance was already running
    Skipped,
    /// Attempted and rejected; the instance is partially provisioned
    Failed { message: String },
}

impl ResourceOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, ResourceOutcome::Failed { .. })
    }
}

/// Per-resource result of a start request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StartReport {
    /// Resource name of the instance
    pub instance: String,
    pub storage: ResourceOutcome,
    pub deployment: ResourceOutcome,
    pub service: ResourceOutcome,
    pub ingress: ResourceOutcome,
    /// Wall time spent in the start call
    pub elapsed_ms: u64,
}

impl StartReport {
    /// Report for an instance that was already running
    pub fn already_running(instance: String) -> Self {
        Self {
            instance,
            storage: ResourceOutcome::Skipped,
            deployment: ResourceOutcome::Skipped,
            service: ResourceOutcome::Skipped,
            ingress: ResourceOutcome::Skipped,
            elapsed_ms: 0,
        }
    }

    /// True when no resource failed
    pub fn is_complete(&self) -> bool {
        ![&self.storage, &self.deployment, &self.service, &self.ingress]
            .iter()
            .any(|outcome| outcome.is_failed())
    }
}

/// What happened to one resource during a stop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum DeleteOutcome {
    Deleted,
    /// Nothing to delete
    Missing,
    Failed { message: String },
}

/// Per-resource result of a stop request. The storage claim is never touched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StopReport {
    pub instance: String,
    pub deployment: DeleteOutcome,
    pub service: DeleteOutcome,
    pub ingress: DeleteOutcome,
}

impl StopReport {
    pub fn has_failures(&self) -> bool {
        [&self.deployment, &self.service, &self.ingress]
            .iter()
            .any(|outcome| matches!(outcome, DeleteOutcome::Failed { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_key_names() {
        let key = InstanceKey::new("demo", "alice");
        assert_eq!(key.resource_name(), "demo-alice");
        assert_eq!(key.volume_name(), "demo-alice-data");
        assert_eq!(key.to_string(), "demo-alice");
    }

    #[test]
    fn test_try_new_trims_input() {
        let key = InstanceKey::try_new(" demo ", "alice\n").unwrap();
        assert_eq!(key, InstanceKey::new("demo", "alice"));
    }

    #[test]
    fn test_hyphenated_names_cannot_collide() {
        // Both pairs would otherwise share the name "a-b-c"
        assert!(InstanceKey::try_new("a", "b-c").is_ok());

        let err = InstanceKey::try_new("a-b", "c").unwrap_err();
        assert_eq!(err.field, "appName");
        assert_eq!(err.value, "a-b");
    }

    #[test]
    fn test_rejects_names_the_cluster_would_refuse() {
        for (app, user) in [
            ("", "alice"),
            ("demo", ""),
            ("Demo", "alice"),
            ("1demo", "alice"),
            ("demo", "Alice"),
            ("demo", "alice@example.com"),
            ("demo", "-alice"),
            ("demo", "alice-"),
            ("demo", "al ice"),
        ] {
            assert!(
                InstanceKey::try_new(app, user).is_err(),
                "({:?}, {:?}) should be rejected",
                app,
                user
            );
        }
    }

    #[test]
    fn test_rejects_overlong_names() {
        let user = "u".repeat(50);
        let err = InstanceKey::try_new("notebook", &user).unwrap_err();
        assert_eq!(err.field, "instance name");

        // 4 + 1 + 53 + 5 = 63
        assert!(InstanceKey::try_new("demo", &"u".repeat(53)).is_ok());
    }

    #[test]
    fn test_app_status_response_shape() {
        let running = AppStatusResponse { status: AppStatus::from(true) };
        assert_eq!(
            serde_json::to_string(&running).unwrap(),
            r#"{"appStatus":"Running"}"#
        );

        let missing = AppStatusResponse { status: AppStatus::from(false) };
        assert_eq!(
            serde_json::to_string(&missing).unwrap(),
            r#"{"appStatus":"Missing"}"#
        );
    }

    #[test]
    fn test_start_report_serialization() {
        let report = StartReport {
            instance: "demo-alice".to_string(),
            storage: ResourceOutcome::Existing,
            deployment: ResourceOutcome::Created,
            service: ResourceOutcome::Created,
            ingress: ResourceOutcome::Failed {
                message: "admission webhook denied".to_string(),
            },
            elapsed_ms: 1200,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["storage"]["outcome"], "existing");
        assert_eq!(json["ingress"]["outcome"], "failed");
        assert_eq!(json["ingress"]["message"], "admission webhook denied");
        assert_eq!(json["elapsedMs"], 1200);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_already_running_report_is_complete() {
        let report = StartReport::already_running("demo-alice".to_string());
        assert_eq!(report.deployment, ResourceOutcome::Skipped);
        assert!(report.is_complete());
    }

    #[test]
    fn test_stop_report_failures() {
        let mut report = StopReport {
            instance: "demo-alice".to_string(),
            deployment: DeleteOutcome::Deleted,
            service: DeleteOutcome::Missing,
            ingress: DeleteOutcome::Deleted,
        };
        assert!(!report.has_failures());

        report.ingress = DeleteOutcome::Failed { message: "forbidden".to_string() };
        assert!(report.has_failures());
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials {
            client_id: "id-123".to_string(),
            client_secret: "s3cret".to_string(),
        };
        let debug = format!("{:?}", creds);
        assert!(debug.contains("id-123"));
        assert!(!debug.contains("s3cret"));
    }
}
