use std::time::Duration;

use anyhow::{Context, Result};
use columbus_orchestrations::{IngressHostMode, LauncherSettings, PollPolicy, ServiceType};

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub launcher: LauncherSettings,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; missing keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = LauncherSettings::default();
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let bind_timeout: u64 = var("COLUMBUS_BIND_TIMEOUT_SECS", "300")
            .parse()
            .context("COLUMBUS_BIND_TIMEOUT_SECS must be a number of seconds")?;
        let conflict_timeout: u64 = var("COLUMBUS_CONFLICT_TIMEOUT_SECS", "120")
            .parse()
            .context("COLUMBUS_CONFLICT_TIMEOUT_SECS must be a number of seconds")?;

        let launcher = LauncherSettings {
            namespace: var("COLUMBUS_NAMESPACE", &defaults.namespace),
            storage_size: var("COLUMBUS_STORAGE_SIZE", &defaults.storage_size),
            service_type: var("COLUMBUS_SERVICE_TYPE", defaults.service_type.as_str())
                .parse::<ServiceType>()
                .map_err(anyhow::Error::msg)
                .context("Invalid COLUMBUS_SERVICE_TYPE")?,
            ingress_host: var("COLUMBUS_INGRESS_HOST", &defaults.ingress_host),
            ingress_host_mode: var("COLUMBUS_INGRESS_HOST_MODE", "shared")
                .parse::<IngressHostMode>()
                .map_err(anyhow::Error::msg)
                .context("Invalid COLUMBUS_INGRESS_HOST_MODE")?,
            ingress_class: var("COLUMBUS_INGRESS_CLASS", &defaults.ingress_class),
            tls_secret: var("COLUMBUS_TLS_SECRET", &defaults.tls_secret),
            forward_credentials: var("COLUMBUS_FORWARD_CREDENTIALS", "true")
                .parse()
                .context("COLUMBUS_FORWARD_CREDENTIALS must be true or false")?,
            bind_wait: PollPolicy::with_timeout(Duration::from_secs(bind_timeout)),
            conflict_retry: PollPolicy::with_timeout(Duration::from_secs(conflict_timeout)),
            ..defaults
        };

        Ok(Self {
            server_host: var("SERVER_HOST", "0.0.0.0"),
            server_port: var("SERVER_PORT", "8080")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            launcher,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.launcher, LauncherSettings::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SERVER_PORT", "9000"),
            ("COLUMBUS_NAMESPACE", "apps"),
            ("COLUMBUS_SERVICE_TYPE", "LoadBalancer"),
            ("COLUMBUS_INGRESS_HOST_MODE", "per-app"),
            ("COLUMBUS_FORWARD_CREDENTIALS", "false"),
            ("COLUMBUS_BIND_TIMEOUT_SECS", "30"),
        ])
        .unwrap();

        assert_eq!(config.server_port, 9000);
        assert_eq!(config.launcher.namespace, "apps");
        assert_eq!(config.launcher.service_type, ServiceType::LoadBalancer);
        assert_eq!(config.launcher.ingress_host_mode, IngressHostMode::PerApp);
        assert!(!config.launcher.forward_credentials);
        assert_eq!(config.launcher.bind_wait.timeout, Duration::from_secs(30));
        assert_eq!(config.launcher.conflict_retry.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(config_from(&[("SERVER_PORT", "eighty")]).is_err());
        assert!(config_from(&[("COLUMBUS_SERVICE_TYPE", "NodePort")]).is_err());
        assert!(config_from(&[("COLUMBUS_BIND_TIMEOUT_SECS", "-1")]).is_err());
    }
}
