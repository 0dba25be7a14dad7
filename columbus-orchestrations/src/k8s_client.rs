//! Shared Kubernetes client utilities

use std::fmt::Debug;

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, Pod, Service};
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::NamespaceResourceScope;
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kube::{Client, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[cfg(test)]
use mockall::automock;

use crate::error::ClusterError;
use crate::types::ResourceKind;

/// Get a Kubernetes client
pub async fn get_k8s_client() -> Result<Client> {
    Client::try_default()
        .await
        .context("Failed to create Kubernetes client")
}

/// Cluster operations the launcher relies on.
///
/// Lookups return `Ok(None)` for missing objects. Deletes use foreground
/// propagation and report a missing object as [`ClusterError::NotFound`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterClient: Send + Sync {
    async fn get_storage_claim(&self, name: &str) -> Result<Option<PersistentVolumeClaim>, ClusterError>;

    async fn create_storage_claim(
        &self,
        claim: &PersistentVolumeClaim,
    ) -> Result<PersistentVolumeClaim, ClusterError>;

    async fn delete_storage_claim(&self, name: &str) -> Result<(), ClusterError>;

    async fn get_deployment(&self, name: &str) -> Result<Option<Deployment>, ClusterError>;

    async fn create_deployment(&self, deployment: &Deployment) -> Result<Deployment, ClusterError>;

    async fn delete_deployment(&self, name: &str) -> Result<(), ClusterError>;

    async fn create_service(&self, service: &Service) -> Result<Service, ClusterError>;

    async fn delete_service(&self, name: &str) -> Result<(), ClusterError>;

    async fn create_ingress(&self, ingress: &Ingress) -> Result<Ingress, ClusterError>;

    async fn delete_ingress(&self, name: &str) -> Result<(), ClusterError>;

    /// Number of pods across all namespaces
    async fn count_pods(&self) -> Result<usize, ClusterError>;
}

/// [`ClusterClient`] backed by the Kubernetes API, scoped to one namespace
#[derive(Clone)]
pub struct KubeClusterClient {
    client: Client,
    namespace: String,
}

impl KubeClusterClient {
    pub fn new(client: Client, namespace: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
        }
    }

    fn api<K>(&self) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        <K as Resource>::DynamicType: Default,
    {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    async fn get<K>(&self, kind: ResourceKind, name: &str) -> Result<Option<K>, ClusterError>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        <K as Resource>::DynamicType: Default,
    {
        match self.api::<K>().get(name).await {
            Ok(object) => Ok(Some(object)),
            Err(kube::Error::Api(response)) if response.code == 404 => Ok(None),
            Err(e) => Err(ClusterError::from_kube(kind, name, e)),
        }
    }

    async fn create<K>(&self, kind: ResourceKind, object: &K) -> Result<K, ClusterError>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Serialize + Debug,
        <K as Resource>::DynamicType: Default,
    {
        self.api::<K>()
            .create(&PostParams::default(), object)
            .await
            .map_err(|e| ClusterError::from_kube(kind, &object.name_any(), e))
    }

    async fn delete<K>(&self, kind: ResourceKind, name: &str) -> Result<(), ClusterError>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        <K as Resource>::DynamicType: Default,
    {
        self.api::<K>()
            .delete(name, &DeleteParams::foreground())
            .await
            .map(|_| ())
            .map_err(|e| ClusterError::from_kube(kind, name, e))
    }
}

#[async_trait]
impl ClusterClient for KubeClusterClient {
    async fn get_storage_claim(&self, name: &str) -> Result<Option<PersistentVolumeClaim>, ClusterError> {
        self.get(ResourceKind::StorageClaim, name).await
    }

    async fn create_storage_claim(
        &self,
        claim: &PersistentVolumeClaim,
    ) -> Result<PersistentVolumeClaim, ClusterError> {
        self.create(ResourceKind::StorageClaim, claim).await
    }

    async fn delete_storage_claim(&self, name: &str) -> Result<(), ClusterError> {
        self.delete::<PersistentVolumeClaim>(ResourceKind::StorageClaim, name).await
    }

    async fn get_deployment(&self, name: &str) -> Result<Option<Deployment>, ClusterError> {
        self.get(ResourceKind::Deployment, name).await
    }

    async fn create_deployment(&self, deployment: &Deployment) -> Result<Deployment, ClusterError> {
        self.create(ResourceKind::Deployment, deployment).await
    }

    async fn delete_deployment(&self, name: &str) -> Result<(), ClusterError> {
        self.delete::<Deployment>(ResourceKind::Deployment, name).await
    }

    async fn create_service(&self, service: &Service) -> Result<Service, ClusterError> {
        self.create(ResourceKind::Service, service).await
    }

    async fn delete_service(&self, name: &str) -> Result<(), ClusterError> {
        self.delete::<Service>(ResourceKind::Service, name).await
    }

    async fn create_ingress(&self, ingress: &Ingress) -> Result<Ingress, ClusterError> {
        self.create(ResourceKind::Ingress, ingress).await
    }

    async fn delete_ingress(&self, name: &str) -> Result<(), ClusterError> {
        self.delete::<Ingress>(ResourceKind::Ingress, name).await
    }

    async fn count_pods(&self) -> Result<usize, ClusterError> {
        let pods: Api<Pod> = Api::all(self.client.clone());
        let pod_list = pods
            .list(&ListParams::default())
            .await
            .map_err(|e| ClusterError::from_kube(ResourceKind::Pod, "*", e))?;
        Ok(pod_list.items.len())
    }
}
