use anyhow::{bail, Result};
use columbus_models::{AppStatusResponse, Credentials, InstanceKey, InstanceSpec};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::config::Config;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn start(
    config: &Config,
    username: String,
    app_name: String,
    image: String,
    client_id: Option<String>,
    client_secret: Option<String>,
) -> Result<()> {
    let credentials = match (client_id, client_secret) {
        (Some(client_id), Some(client_secret)) => Some(Credentials {
            client_id,
            client_secret,
        }),
        _ => None,
    };
    let spec = InstanceSpec {
        image_path: image,
        key: InstanceKey::try_new(&app_name, &username)?,
        credentials,
    };
    let orchestrator = super::connect(config).await?;

    // Ctrl+C abandons the bind wait; anything already created stays in the cluster
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        super::shutdown_signal().await;
        signal_token.cancel();
    });

    let report = orchestrator.start(spec, &cancel).await?;
    print_json(&report)?;

    if !report.is_complete() {
        bail!("Instance {} was only partially provisioned", report.instance);
    }
    Ok(())
}

pub async fn stop(config: &Config, username: String, app_name: String) -> Result<()> {
    let key = InstanceKey::try_new(&app_name, &username)?;
    let orchestrator = super::connect(config).await?;

    let report = orchestrator.stop(&key).await?;
    print_json(&report)?;

    if report.has_failures() {
        bail!("Failed to delete some resources of {}", report.instance);
    }
    Ok(())
}

pub async fn status(config: &Config, username: String, app_name: String) -> Result<()> {
    let key = InstanceKey::try_new(&app_name, &username)?;
    let orchestrator = super::connect(config).await?;

    let status = orchestrator.get_status(&key).await?;
    print_json(&AppStatusResponse { status })
}

pub async fn delete_storage(
    config: &Config,
    username: String,
    app_name: String,
    yes: bool,
) -> Result<()> {
    let key = InstanceKey::try_new(&app_name, &username)?;
    if !yes {
        bail!(
            "Refusing to delete the storage of {} without --yes; its data cannot be recovered",
            key
        );
    }

    let orchestrator = super::connect(config).await?;
    orchestrator.delete_storage(&key).await?;

    print_json(&serde_json::json!({ "deleted": key.resource_name() }))
}

pub async fn pods(config: &Config) -> Result<()> {
    let orchestrator = super::connect(config).await?;

    let count = orchestrator.cluster().count_pods().await?;
    println!("There are {} pods in the cluster", count);
    Ok(())
}
