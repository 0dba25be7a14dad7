//! Settings shared by the resource builders and the lifecycle orchestrator

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// The resource kinds an application instance is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    StorageClaim,
    Deployment,
    Service,
    Ingress,
    Pod,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::StorageClaim => "PersistentVolumeClaim",
            ResourceKind::Deployment => "Deployment",
            ResourceKind::Service => "Service",
            ResourceKind::Ingress => "Ingress",
            ResourceKind::Pod => "Pod",
        };
        f.write_str(name)
    }
}

/// How the instance's Service is exposed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    ClusterIp,
    LoadBalancer,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::ClusterIp => "ClusterIP",
            ServiceType::LoadBalancer => "LoadBalancer",
        }
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clusterip" => Ok(ServiceType::ClusterIp),
            "loadbalancer" => Ok(ServiceType::LoadBalancer),
            other => Err(format!(
                "unknown service type '{}' (expected ClusterIP or LoadBalancer)",
                other
            )),
        }
    }
}

/// Whether all instances share one ingress host or each app gets its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngressHostMode {
    /// Every instance is routed under the configured host
    Shared,
    /// Instances are routed under `<appName>.<host>`
    PerApp,
}

impl FromStr for IngressHostMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shared" => Ok(IngressHostMode::Shared),
            "per-app" | "per_app" | "perapp" => Ok(IngressHostMode::PerApp),
            other => Err(format!(
                "unknown ingress host mode '{}' (expected shared or per-app)",
                other
            )),
        }
    }
}

/// Backoff and deadline for waiting on an external condition
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// Delay after the first unsuccessful attempt
    pub initial_delay: Duration,
    /// Upper bound for a single delay
    pub max_delay: Duration,
    /// Growth factor applied to the delay after each attempt
    pub multiplier: f64,
    /// Give up once this much time has passed since the first attempt
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
            timeout: Duration::from_secs(300),
        }
    }
}

impl PollPolicy {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Default::default()
        }
    }
}

/// Cluster-side settings for every instance the launcher manages
#[derive(Debug, Clone, PartialEq)]
pub struct LauncherSettings {
    /// Namespace all instance resources live in
    pub namespace: String,
    /// Storage request of each claim (Kubernetes quantity)
    pub storage_size: String,
    /// Port the application container listens on
    pub container_port: i32,
    /// Port the Service exposes
    pub service_port: i32,
    pub service_type: ServiceType,
    pub ingress_host: String,
    pub ingress_host_mode: IngressHostMode,
    pub ingress_class: String,
    /// Secret holding the TLS certificate for the ingress host
    pub tls_secret: String,
    /// Pass client id/secret to the container as env vars
    pub forward_credentials: bool,
    /// Waiting for the storage claim to bind
    pub bind_wait: PollPolicy,
    /// Retrying a deployment create while the previous one is terminating
    pub conflict_retry: PollPolicy,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            storage_size: "10Gi".to_string(),
            container_port: 8000,
            service_port: 80,
            service_type: ServiceType::ClusterIp,
            ingress_host: "cdrive.columbusecosystem.com".to_string(),
            ingress_host_mode: IngressHostMode::Shared,
            ingress_class: "nginx".to_string(),
            tls_secret: "tls-staging-cert".to_string(),
            forward_credentials: true,
            bind_wait: PollPolicy::with_timeout(Duration::from_secs(300)),
            conflict_retry: PollPolicy::with_timeout(Duration::from_secs(120)),
        }
    }
}
