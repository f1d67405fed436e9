//! Typed model of the kind cluster configuration file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const KIND_API_VERSION: &str = "kind.x-k8s.io/v1alpha4";

/// Where kubelet looks for registry credentials inside a node
pub const KUBELET_DOCKER_CONFIG: &str = "/var/lib/kubelet/config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    pub kind: String,
    pub api_version: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containerd_config_patches: Vec<String>,

    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeRole {
    ControlPlane,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub role: NodeRole,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_mounts: Vec<ExtraMount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraMount {
    pub container_path: String,
    pub host_path: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            kind: "Cluster".to_string(),
            api_version: KIND_API_VERSION.to_string(),
            containerd_config_patches: Vec::new(),
            nodes: vec![Node {
                role: NodeRole::ControlPlane,
                extra_mounts: Vec::new(),
            }],
        }
    }
}

impl ClusterConfig {
    /// True when this config differs from what kind does without `--config`
    pub fn is_customized(&self) -> bool {
        *self != Self::default()
    }

    /// Mount a host file into every node
    pub fn add_mount(&mut self, host_path: &str, container_path: &str) {
        for node in &mut self.nodes {
            node.extra_mounts.push(ExtraMount {
                container_path: container_path.to_string(),
                host_path: host_path.to_string(),
                read_only: true,
            });
        }
    }

    pub fn add_containerd_patch(&mut self, patch: String) {
        self.containerd_config_patches.push(patch);
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize kind config")
    }
}
