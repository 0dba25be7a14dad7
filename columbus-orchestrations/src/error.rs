//! Error types for cluster access and instance lifecycle operations

use std::time::Duration;

use columbus_models::InvalidInstanceKey;
use thiserror::Error;

use crate::types::ResourceKind;

/// A cluster API call failed
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: ResourceKind, name: String },

    #[error("{kind} '{name}' already exists")]
    AlreadyExists { kind: ResourceKind, name: String },

    /// A same-named object exists but carries a deletion timestamp
    #[error("{kind} '{name}' is still being deleted")]
    BeingDeleted { kind: ResourceKind, name: String },

    #[error("{kind} '{name}': API error {code}: {message}")]
    Api {
        kind: ResourceKind,
        name: String,
        code: u16,
        message: String,
    },

    #[error("{kind} '{name}': {message}")]
    Transport {
        kind: ResourceKind,
        name: String,
        message: String,
    },
}

impl ClusterError {
    pub fn from_kube(kind: ResourceKind, name: &str, err: kube::Error) -> Self {
        match err {
            kube::Error::Api(response) => Self::from_status(kind, name, response.code, &response.message),
            other => ClusterError::Transport {
                kind,
                name: name.to_string(),
                message: other.to_string(),
            },
        }
    }

    /// Classify an API server status response
    pub fn from_status(kind: ResourceKind, name: &str, code: u16, message: &str) -> Self {
        let name = name.to_string();
        match code {
            404 => ClusterError::NotFound { kind, name },
            409 if message.contains("being deleted") => ClusterError::BeingDeleted { kind, name },
            409 => ClusterError::AlreadyExists { kind, name },
            _ => ClusterError::Api {
                kind,
                name,
                code,
                message: message.to_string(),
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClusterError::NotFound { .. })
    }
}

/// A lifecycle operation could not complete
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    InvalidKey(#[from] InvalidInstanceKey),

    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error("timed out after {after:?} waiting for {waiting_for}")]
    Timeout { waiting_for: String, after: Duration },

    #[error("cancelled while waiting for {waiting_for}")]
    Cancelled { waiting_for: String },

    #[error("failed to render {template} manifest: {source}")]
    Template {
        template: String,
        #[source]
        source: tera::Error,
    },

    #[error("rendered {template} manifest is invalid: {source}")]
    Manifest {
        template: String,
        #[source]
        source: serde_yaml::Error,
    },
}

impl LifecycleError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LifecycleError::Cluster(err) if err.is_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_not_found() {
        let err = ClusterError::from_status(ResourceKind::StorageClaim, "demo-alice", 404, "not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_classifies_being_deleted_conflict() {
        let err = ClusterError::from_status(
            ResourceKind::Deployment,
            "demo-alice",
            409,
            "object is being deleted: deployments.apps \"demo-alice\" already exists",
        );
        assert!(matches!(err, ClusterError::BeingDeleted { .. }));
    }

    #[test]
    fn test_classifies_plain_conflict() {
        let err = ClusterError::from_status(
            ResourceKind::Service,
            "demo-alice",
            409,
            "services \"demo-alice\" already exists",
        );
        assert!(matches!(err, ClusterError::AlreadyExists { .. }));
    }

    #[test]
    fn test_other_codes_keep_message() {
        let err = ClusterError::from_status(ResourceKind::Ingress, "demo-alice", 403, "forbidden");
        assert_eq!(err.to_string(), "Ingress 'demo-alice': API error 403: forbidden");
    }

    #[test]
    fn test_lifecycle_not_found() {
        let err: LifecycleError = ClusterError::NotFound {
            kind: ResourceKind::StorageClaim,
            name: "demo-alice".to_string(),
        }
        .into();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "PersistentVolumeClaim 'demo-alice' not found");
    }
}
