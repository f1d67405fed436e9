//! Per-cluster state directory layout
//!
//! ```text
//! <root>/<cluster>/kubeconfig
//! <root>/<cluster>/kind_config
//! <root>/<cluster>/docker_config
//! ```

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};

const STATE_DIR_NAME: &str = ".nomake";

#[derive(Debug, Clone)]
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `~/.nomake`, unless overridden
    pub fn resolve(configured: Option<&str>) -> Result<Self> {
        if let Some(path) = configured {
            return Ok(Self::new(path));
        }

        let home = dirs::home_dir().ok_or_else(|| anyhow!("User does not have a home directory"))?;
        Ok(Self::new(home.join(STATE_DIR_NAME)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cluster_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn kubeconfig(&self, name: &str) -> PathBuf {
        self.cluster_dir(name).join("kubeconfig")
    }

    pub fn kind_config(&self, name: &str) -> PathBuf {
        self.cluster_dir(name).join("kind_config")
    }

    pub fn docker_config(&self, name: &str) -> PathBuf {
        self.cluster_dir(name).join("docker_config")
    }

    pub fn has_cluster(&self, name: &str) -> bool {
        self.cluster_dir(name).is_dir()
    }

    /// Create the directory for a cluster, including the root
    pub fn create_cluster_dir(&self, name: &str) -> Result<PathBuf> {
        let dir = self.cluster_dir(name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create state directory {}", dir.display()))?;
        Ok(dir)
    }

    /// Remove a cluster's directory. Missing directories are not an error.
    pub fn remove_cluster_dir(&self, name: &str) -> Result<()> {
        let dir = self.cluster_dir(name);
        if !dir.exists() {
            return Ok(());
        }
        fs::remove_dir_all(&dir)
            .with_context(|| format!("Failed to remove state directory {}", dir.display()))
    }

    /// Names of all clusters with a state directory, sorted
    pub fn clusters(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut clusters = Vec::new();
        for entry in fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read {}", self.root.display()))?
        {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                clusters.push(name.to_string());
            }
        }

        clusters.sort();
        Ok(clusters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout() {
        let state = StateDir::new("/tmp/state");
        assert_eq!(state.kubeconfig("dev"), PathBuf::from("/tmp/state/dev/kubeconfig"));
        assert_eq!(state.kind_config("dev"), PathBuf::from("/tmp/state/dev/kind_config"));
        assert_eq!(
            state.docker_config("dev"),
            PathBuf::from("/tmp/state/dev/docker_config")
        );
    }

    #[test]
    fn test_resolve_prefers_configured_path() {
        let state = StateDir::resolve(Some("/srv/nomake")).unwrap();
        assert_eq!(state.root(), Path::new("/srv/nomake"));
    }

    #[test]
    fn test_missing_root_lists_nothing() {
        let tmp = TempDir::new().unwrap();
        let state = StateDir::new(tmp.path().join("absent"));
        assert!(state.clusters().unwrap().is_empty());
    }

    #[test]
    fn test_clusters_sorted_and_ignore_files() {
        let tmp = TempDir::new().unwrap();
        let state = StateDir::new(tmp.path());
        state.create_cluster_dir("zeta").unwrap();
        state.create_cluster_dir("alpha").unwrap();
        fs::write(tmp.path().join("stray-file"), "x").unwrap();

        assert_eq!(state.clusters().unwrap(), vec!["alpha", "zeta"]);
        assert!(state.has_cluster("alpha"));
        assert!(!state.has_cluster("stray-file"));
    }

    #[test]
    fn test_remove_cluster_dir_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let state = StateDir::new(tmp.path());
        state.create_cluster_dir("dev").unwrap();
        fs::write(state.kubeconfig("dev"), "apiVersion: v1").unwrap();

        state.remove_cluster_dir("dev").unwrap();
        assert!(!state.has_cluster("dev"));
        state.remove_cluster_dir("dev").unwrap();
    }
}
