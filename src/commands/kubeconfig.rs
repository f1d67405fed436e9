//! `nomake config`: where the cluster's kubeconfig lives

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::config::settings::Settings;
use crate::k8s::kind::validate_cluster_name;
use crate::k8s::kubeconfig;
use crate::utils::errors::NomakeError;
use crate::utils::paths::StateDir;

/// Handle config command. Only the result goes to stdout.
pub fn config(name: String, env: bool, settings: &Settings) -> Result<()> {
    let state = StateDir::resolve(settings.defaults.state_dir.as_deref())?;
    let path = resolve(&state, &name)?;
    println!("{}", render(&path, env));
    Ok(())
}

/// Locate and validate a cluster's kubeconfig
pub fn resolve(state: &StateDir, name: &str) -> Result<PathBuf> {
    validate_cluster_name(name)?;

    let path = state.kubeconfig(name);
    if !path.is_file() {
        return Err(NomakeError::UnknownCluster(name.to_string()).into());
    }

    let kc = kubeconfig::load(&path)?;
    crate::log_info!(
        "Current context: {}",
        kc.current_context.as_deref().unwrap_or("<none>")
    );

    Ok(path.canonicalize().unwrap_or(path))
}

fn render(path: &Path, env: bool) -> String {
    if env {
        kubeconfig::export_line(path)
    } else {
        path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::exit_code;
    use std::fs;
    use tempfile::TempDir;

    const MINIMAL_KUBECONFIG: &str = r#"apiVersion: v1
kind: Config
clusters:
- cluster:
    server: https://127.0.0.1:6443
  name: kind-dev
contexts:
- context:
    cluster: kind-dev
    user: kind-dev
  name: kind-dev
current-context: kind-dev
users:
- name: kind-dev
  user: {}
"#;

    #[test]
    fn test_unknown_cluster() {
        let tmp = TempDir::new().unwrap();
        let state = StateDir::new(tmp.path());

        let err = resolve(&state, "ghost").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NomakeError>(),
            Some(NomakeError::UnknownCluster(name)) if name == "ghost"
        ));
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn test_invalid_name_is_usage_error() {
        let tmp = TempDir::new().unwrap();
        let state = StateDir::new(tmp.path());
        let err = resolve(&state, "../dev").unwrap_err();
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn test_resolve_and_render() {
        let tmp = TempDir::new().unwrap();
        let state = StateDir::new(tmp.path());
        state.create_cluster_dir("dev").unwrap();
        fs::write(state.kubeconfig("dev"), MINIMAL_KUBECONFIG).unwrap();

        let path = resolve(&state, "dev").unwrap();
        assert!(path.ends_with("dev/kubeconfig"));

        assert_eq!(render(&path, false), path.display().to_string());
        let line = render(&path, true);
        assert!(line.starts_with("export KUBECONFIG="));
        assert!(line.ends_with("dev/kubeconfig"));
    }

    #[test]
    fn test_corrupt_kubeconfig_is_reported() {
        let tmp = TempDir::new().unwrap();
        let state = StateDir::new(tmp.path());
        state.create_cluster_dir("dev").unwrap();
        fs::write(state.kubeconfig("dev"), "clusters: [oops").unwrap();

        let err = resolve(&state, "dev").unwrap_err();
        assert!(err.to_string().contains("Failed to read kubeconfig"));
    }
}
