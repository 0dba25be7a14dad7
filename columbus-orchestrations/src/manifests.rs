//! Resource builders: render the instance templates into typed Kubernetes objects
//!
//! Every user-supplied value is passed through `json_encode`, so the rendered
//! YAML stays well-formed whatever the caller sends.

use columbus_models::{InstanceKey, InstanceSpec};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, Service};
use k8s_openapi::api::networking::v1::Ingress;
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tera::{Context as TeraContext, Tera};

use crate::error::LifecycleError;
use crate::names::{self, env};
use crate::types::LauncherSettings;

const STORAGE_CLAIM: &str = "storage-claim";
const DEPLOYMENT: &str = "deployment";
const SERVICE: &str = "service";
const INGRESS: &str = "ingress";

static TEMPLATES: OnceCell<Tera> = OnceCell::new();

fn templates() -> Result<&'static Tera, LifecycleError> {
    TEMPLATES.get_or_try_init(|| {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (STORAGE_CLAIM, include_str!("../templates/app-pvc.yaml")),
            (DEPLOYMENT, include_str!("../templates/app-deployment.yaml")),
            (SERVICE, include_str!("../templates/app-service.yaml")),
            (INGRESS, include_str!("../templates/app-ingress.yaml")),
        ])
        .map_err(|source| LifecycleError::Template {
            template: "instance".to_string(),
            source,
        })?;
        Ok(tera)
    })
}

fn render<K: DeserializeOwned>(template: &str, ctx: &TeraContext) -> Result<K, LifecycleError> {
    let yaml = templates()?
        .render(template, ctx)
        .map_err(|source| LifecycleError::Template {
            template: template.to_string(),
            source,
        })?;
    serde_yaml::from_str(&yaml).map_err(|source| LifecycleError::Manifest {
        template: template.to_string(),
        source,
    })
}

fn base_context(key: &InstanceKey, settings: &LauncherSettings) -> TeraContext {
    let mut ctx = TeraContext::new();
    ctx.insert("name", &key.resource_name());
    ctx.insert("namespace", &settings.namespace);
    ctx.insert("container_port", &settings.container_port);
    ctx.insert("service_port", &settings.service_port);
    ctx
}

#[derive(Serialize)]
struct EnvEntry<'a> {
    name: &'a str,
    value: &'a str,
}

/// Exclusive read-write claim of the configured size
pub fn storage_claim(
    key: &InstanceKey,
    settings: &LauncherSettings,
) -> Result<PersistentVolumeClaim, LifecycleError> {
    let mut ctx = base_context(key, settings);
    ctx.insert("storage_size", &settings.storage_size);
    render(STORAGE_CLAIM, &ctx)
}

/// Single-replica deployment of the instance image with the claim mounted
/// at `/storage`. Credential env vars are rendered only when present.
pub fn deployment(spec: &InstanceSpec, settings: &LauncherSettings) -> Result<Deployment, LifecycleError> {
    let mut env_vars = vec![EnvEntry {
        name: env::USERNAME,
        value: &spec.key.username,
    }];
    if let Some(credentials) = &spec.credentials {
        env_vars.push(EnvEntry {
            name: env::CLIENT_ID,
            value: &credentials.client_id,
        });
        env_vars.push(EnvEntry {
            name: env::CLIENT_SECRET,
            value: &credentials.client_secret,
        });
    }

    let mut ctx = base_context(&spec.key, settings);
    ctx.insert("image", &spec.image_path);
    ctx.insert("env", &env_vars);
    ctx.insert("volume", &spec.key.volume_name());
    ctx.insert("mount_path", names::STORAGE_MOUNT_PATH);
    render(DEPLOYMENT, &ctx)
}

pub fn service(key: &InstanceKey, settings: &LauncherSettings) -> Result<Service, LifecycleError> {
    let mut ctx = base_context(key, settings);
    ctx.insert("service_type", settings.service_type.as_str());
    render(SERVICE, &ctx)
}

/// TLS-terminated route from `/app/<username>/<appName>` to the service
pub fn ingress(key: &InstanceKey, settings: &LauncherSettings) -> Result<Ingress, LifecycleError> {
    let mut ctx = base_context(key, settings);
    ctx.insert("host", &names::ingress_host(key, settings));
    ctx.insert("path", &names::ingress_path(key));
    ctx.insert("ingress_class", &settings.ingress_class);
    ctx.insert("tls_secret", &settings.tls_secret);
    render(INGRESS, &ctx)
}
