//! Reading the kubeconfig files kind writes into the state directory

use anyhow::{Context, Result};
use kube::config::Kubeconfig;
use std::path::Path;

/// Parse a kubeconfig file
pub fn load(path: &Path) -> Result<Kubeconfig> {
    Kubeconfig::read_from(path)
        .with_context(|| format!("Failed to read kubeconfig {}", path.display()))
}

/// API server URL of the current context's cluster
pub fn api_server(config: &Kubeconfig) -> Option<String> {
    let current = config.current_context.as_deref()?;
    let cluster_name = config
        .contexts
        .iter()
        .find(|c| c.name == current)
        .and_then(|c| c.context.as_ref())
        .map(|c| c.cluster.as_str())?;

    config
        .clusters
        .iter()
        .find(|c| c.name == cluster_name)
        .and_then(|c| c.cluster.as_ref())
        .and_then(|c| c.server.clone())
}

/// Shell line that points kubectl at `path`
pub fn export_line(path: &Path) -> String {
    format!(
        "export KUBECONFIG={}",
        shell_words::quote(&path.to_string_lossy())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const KIND_KUBECONFIG: &str = r#"apiVersion: v1
kind: Config
clusters:
- cluster:
    certificate-authority-data: Zm9v
    server: https://127.0.0.1:40123
  name: kind-dev
contexts:
- context:
    cluster: kind-dev
    user: kind-dev
  name: kind-dev
current-context: kind-dev
preferences: {}
users:
- name: kind-dev
  user:
    token: abc
"#;

    #[test]
    fn test_load_and_api_server() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("kubeconfig");
        fs::write(&path, KIND_KUBECONFIG).unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.current_context.as_deref(), Some("kind-dev"));
        assert_eq!(api_server(&config).as_deref(), Some("https://127.0.0.1:40123"));
    }

    #[test]
    fn test_api_server_without_current_context() {
        let config = Kubeconfig::default();
        assert!(api_server(&config).is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = load(&tmp.path().join("absent")).unwrap_err();
        assert!(err.to_string().contains("Failed to read kubeconfig"));
    }

    #[test]
    fn test_export_line() {
        assert_eq!(
            export_line(Path::new("/home/me/.nomake/dev/kubeconfig")),
            "export KUBECONFIG=/home/me/.nomake/dev/kubeconfig"
        );
        assert_eq!(
            export_line(Path::new("/home/my user/.nomake/dev/kubeconfig")),
            "export KUBECONFIG='/home/my user/.nomake/dev/kubeconfig'"
        );
    }
}
