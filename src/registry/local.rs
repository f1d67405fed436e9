//! Local registry wired into kind as a containerd mirror

use anyhow::Result;
use std::path::Path;

use crate::k8s::kind_config::ClusterConfig;
use crate::k8s::kubectl;
use crate::utils::ContainerRuntime;
use crate::utils::errors::NomakeError;

/// Docker network kind attaches its nodes to
pub const KIND_NETWORK: &str = "kind";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRegistry {
    /// Container name, reachable by that name on the kind network
    pub name: String,
    pub port: u16,
}

impl LocalRegistry {
    pub fn new(name: impl Into<String>, port: u16) -> Result<Self, NomakeError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(NomakeError::InvalidArgument(
                "--use-local-registry needs a registry container name".to_string(),
            ));
        }
        Ok(Self { name, port })
    }

    /// Address pods and `docker push` use
    pub fn host_address(&self) -> String {
        format!("localhost:{}", self.port)
    }

    /// Address the nodes reach the registry at
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}", self.name, self.port)
    }

    pub fn containerd_patch(&self) -> String {
        format!(
            "[plugins.\"io.containerd.grpc.v1.cri\".registry.mirrors.\"{}\"]\n  endpoint = [\"{}\"]\n",
            self.host_address(),
            self.endpoint()
        )
    }

    /// Add the mirror to a cluster config
    pub fn configure(&self, config: &mut ClusterConfig) {
        config.add_containerd_patch(self.containerd_patch());
    }

    /// Fails if the registry container is not running
    pub fn ensure_running(&self, runtime: ContainerRuntime) -> Result<()> {
        if !runtime.is_running(&self.name) {
            return Err(NomakeError::RegistryNotRunning(self.name.clone()).into());
        }
        Ok(())
    }

    /// Attach the registry to the kind network once the cluster exists
    pub fn connect(&self, runtime: ContainerRuntime) -> Result<()> {
        if runtime.is_connected(&self.name, KIND_NETWORK)? {
            crate::log_debug!("{} already on network {}", self.name, KIND_NETWORK);
            return Ok(());
        }
        runtime.connect(&self.name, KIND_NETWORK)
    }

    /// ConfigMap advertising the registry to cluster tooling (KEP-1755)
    pub fn hosting_config_map(&self) -> String {
        format!(
            r#"apiVersion: v1
kind: ConfigMap
metadata:
  name: local-registry-hosting
  namespace: kube-public
data:
  localRegistryHosting.v1: |
    host: "{}"
    help: "https://kind.sigs.k8s.io/docs/user/local-registry/"
"#,
            self.host_address()
        )
    }

    /// Publish the hosting ConfigMap. Failure only warns: the mirror works without it.
    pub fn publish(&self, kubeconfig: &Path) {
        if let Err(e) = kubectl::apply_yaml(&self.hosting_config_map(), Some(kubeconfig)) {
            crate::log_warn!("Could not publish local-registry-hosting ConfigMap: {:#}", e);
        }
    }
}
