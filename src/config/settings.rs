//! Configuration file support for nomake

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub kind: KindSettings,

    #[serde(default)]
    pub registry: RegistrySettings,
}

/// Default values for common operations
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Defaults {
    #[serde(default = "default_cluster_name")]
    pub cluster_name: String,

    /// Where per-cluster state lives. Defaults to ~/.nomake
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<String>,
}

/// Kind invocation settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct KindSettings {
    #[serde(default = "default_kind_binary")]
    pub binary: String,

    /// Node image used when --node-image is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_image: Option<String>,
}

/// Registry access settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RegistrySettings {
    #[serde(default = "default_credential_helper")]
    pub credential_helper: String,

    #[serde(default = "default_local_registry_port")]
    pub local_registry_port: u16,
}

// Default value functions
fn default_cluster_name() -> String {
    "nomake-default".to_string()
}

fn default_kind_binary() -> String {
    "kind".to_string()
}

fn default_credential_helper() -> String {
    "docker-credential-ecr-login".to_string()
}

fn default_local_registry_port() -> u16 {
    5000
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            cluster_name: default_cluster_name(),
            state_dir: None,
        }
    }
}

impl Default for KindSettings {
    fn default() -> Self {
        Self {
            binary: default_kind_binary(),
            node_image: None,
        }
    }
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            credential_helper: default_credential_helper(),
            local_registry_port: default_local_registry_port(),
        }
    }
}

impl Settings {
    /// Load settings from file or return defaults
    pub fn load() -> Self {
        let Some(path) = Self::find_config_file() else {
            return Self::default();
        };

        match Self::load_from_file(&path) {
            Ok(settings) => {
                crate::log_debug!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                crate::log_warn!("{:#}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Find config file in standard locations
    /// Priority:
    /// 1. .nomake.toml in current directory
    /// 2. ~/.config/nomake/config.toml (XDG config directory)
    fn find_config_file() -> Option<PathBuf> {
        let local_config = PathBuf::from(".nomake.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("nomake").join("config.toml");
            if xdg_config.exists() {
                return Some(xdg_config);
            }
        }

        None
    }

    /// Cluster name from the command line, or the configured default
    pub fn cluster_name(&self, cli: Option<String>) -> String {
        cli.unwrap_or_else(|| self.defaults.cluster_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.defaults.cluster_name, "nomake-default");
        assert!(settings.defaults.state_dir.is_none());
        assert_eq!(settings.kind.binary, "kind");
        assert_eq!(settings.registry.credential_helper, "docker-credential-ecr-login");
        assert_eq!(settings.registry.local_registry_port, 5000);
    }

    #[test]
    fn test_settings_deserialization() {
        let toml_str = r#"
[defaults]
cluster_name = "my-cluster"
state_dir = "/var/tmp/nomake"

[registry]
local_registry_port = 5001
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.defaults.cluster_name, "my-cluster");
        assert_eq!(settings.defaults.state_dir.as_deref(), Some("/var/tmp/nomake"));
        assert_eq!(settings.registry.local_registry_port, 5001);
        // untouched sections keep their defaults
        assert_eq!(settings.registry.credential_helper, "docker-credential-ecr-login");
        assert_eq!(settings.kind.binary, "kind");
    }

    #[test]
    fn test_load_from_file_reports_bad_toml() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "[defaults\ncluster_name = ").unwrap();
        let err = Settings::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_cluster_name_fallback() {
        let settings = Settings::default();
        assert_eq!(settings.cluster_name(None), "nomake-default");
        assert_eq!(settings.cluster_name(Some("dev".to_string())), "dev");
    }
}
