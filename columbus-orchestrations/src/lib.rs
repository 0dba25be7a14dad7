//! Columbus Orchestrations - lifecycle of per-user application instances on Kubernetes
//!
//! An instance is a storage claim, a deployment, a service and an ingress, all
//! named `<appName>-<username>`. The [`LifecycleOrchestrator`] starts, stops and
//! inspects instances; the cluster is the only place their state is kept.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use columbus_models::{InstanceKey, InstanceSpec};
//! use columbus_orchestrations::k8s_client::{get_k8s_client, KubeClusterClient};
//! use columbus_orchestrations::{LauncherSettings, LifecycleOrchestrator};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let settings = LauncherSettings::default();
//! let client = KubeClusterClient::new(get_k8s_client().await?, &settings.namespace);
//! let orchestrator = LifecycleOrchestrator::new(Arc::new(client), settings);
//!
//! let spec = InstanceSpec {
//!     image_path: "registry.example.com/notebook:v1".to_string(),
//!     key: InstanceKey::new("notebook", "alice"),
//!     credentials: None,
//! };
//! let report = orchestrator.start(spec, &CancellationToken::new()).await?;
//! println!("{:?}", report);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod k8s_client;
pub mod manifests;
pub mod names;
pub mod poll;
pub mod types;

mod activities;
mod orchestrations;

pub use error::{ClusterError, LifecycleError};
pub use orchestrations::LifecycleOrchestrator;
pub use types::*;
