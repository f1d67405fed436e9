//! Kind cluster management operations

use anyhow::Result;
use std::path::Path;
use std::process::Command;

use crate::utils::errors::NomakeError;
use crate::utils::exec;

#[derive(Debug, Clone)]
pub struct KindCluster {
    pub name: String,
    binary: String,
    node_image: Option<String>,
    stream_output: bool,
}

impl KindCluster {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            binary: "kind".to_string(),
            node_image: None,
            stream_output: false,
        }
    }

    /// Use a kind binary other than `kind` from PATH
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn set_node_image(&mut self, image: Option<String>) {
        self.node_image = image;
    }

    /// Stream kind's own output instead of capturing it
    pub fn set_verbose(&mut self, verbose: bool) {
        self.stream_output = verbose;
    }

    /// Check if this cluster exists
    pub fn exists(&self) -> Result<bool> {
        Ok(Self::list_all_with(&self.binary)?
            .iter()
            .any(|c| *c == self.name))
    }

    /// List all kind clusters
    pub fn list_all_with(binary: &str) -> Result<Vec<String>> {
        let mut cmd = Command::new(binary);
        cmd.args(["get", "clusters"]);
        let out = exec::query(&mut cmd, binary)?;
        Ok(parse_clusters(&out))
    }

    /// Create the cluster, writing its kubeconfig to `kubeconfig`
    pub fn create(&self, kubeconfig: &Path, config: Option<&Path>) -> Result<()> {
        crate::log_info!("Creating kind cluster '{}'...", self.name);

        let mut cmd = self.create_command(kubeconfig, config);
        self.run(&mut cmd)?;

        crate::log_info!("Cluster '{}' created successfully", self.name);
        Ok(())
    }

    /// Delete the kind cluster
    pub fn delete(&self) -> Result<()> {
        crate::log_info!("Deleting kind cluster '{}'...", self.name);

        let mut cmd = Command::new(&self.binary);
        cmd.args(["delete", "cluster", "--name", &self.name]);
        self.run(&mut cmd)?;

        crate::log_info!("Cluster '{}' deleted successfully", self.name);
        Ok(())
    }

    fn create_command(&self, kubeconfig: &Path, config: Option<&Path>) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["create", "cluster", "--name", &self.name]);
        cmd.arg("--kubeconfig").arg(kubeconfig);

        if let Some(config) = config {
            cmd.arg("--config").arg(config);
        }

        if let Some(image) = &self.node_image {
            cmd.args(["--image", image]);
        }

        cmd
    }

    fn run(&self, cmd: &mut Command) -> Result<()> {
        if self.stream_output {
            exec::run(cmd, &self.binary)
        } else {
            exec::run_quiet(cmd, &self.binary)
        }
    }
}

/// Parse `kind get clusters` output
fn parse_clusters(out: &str) -> Vec<String> {
    out.lines()
        .map(str::trim)
        // kind prints this instead of an empty list
        .filter(|s| !s.is_empty() && *s != "No kind clusters found.")
        .map(str::to_string)
        .collect()
}

/// Kind accepts lowercase alphanumerics, `-` and `.`, starting with an alphanumeric
pub fn validate_cluster_name(name: &str) -> Result<(), NomakeError> {
    let valid_char = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.';

    match name.chars().next() {
        None => Err(NomakeError::InvalidArgument(
            "cluster name must not be empty".to_string(),
        )),
        Some(first) if !(first.is_ascii_lowercase() || first.is_ascii_digit()) => {
            Err(NomakeError::InvalidArgument(format!(
                "cluster name '{}' must start with a lowercase letter or digit",
                name
            )))
        }
        _ if !name.chars().all(valid_char) => Err(NomakeError::InvalidArgument(format!(
            "cluster name '{}' may only contain lowercase letters, digits, '-' and '.'",
            name
        ))),
        _ => Ok(()),
    }
}
