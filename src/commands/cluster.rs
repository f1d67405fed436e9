//! Cluster command implementations

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use crate::config::settings::Settings;
use crate::k8s::kind::{KindCluster, validate_cluster_name};
use crate::k8s::kind_config::{ClusterConfig, KUBELET_DOCKER_CONFIG};
use crate::k8s::kubeconfig;
use crate::registry::{LocalRegistry, ecr};
use crate::utils::errors::NomakeError;
use crate::utils::paths::StateDir;
use crate::utils::{ContainerRuntime, dryrun};

/// Options for `nomake create`
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub name: String,
    /// ECR registry host to grant pull access to
    pub ecr: Option<String>,
    /// Name of a running registry container to use as mirror
    pub local_registry: Option<String>,
    pub node_image: Option<String>,
    pub verbose: bool,
}

/// Handle cluster create command
pub fn create(opts: CreateOptions, settings: &Settings) -> Result<()> {
    validate_cluster_name(&opts.name)?;
    let ecr_host = opts.ecr.as_deref().map(ecr::normalize_host).transpose()?;
    let registry = opts
        .local_registry
        .map(|name| LocalRegistry::new(name, settings.registry.local_registry_port))
        .transpose()?;

    let state = StateDir::resolve(settings.defaults.state_dir.as_deref())?;

    let mut cluster = KindCluster::new(&opts.name).with_binary(&settings.kind.binary);
    cluster.set_node_image(opts.node_image.or_else(|| settings.kind.node_image.clone()));
    cluster.set_verbose(opts.verbose);

    let runtime = match &registry {
        Some(registry) => {
            let runtime = ContainerRuntime::detect()?;
            registry.ensure_running(runtime)?;
            Some(runtime)
        }
        None => None,
    };

    if cluster.exists()? {
        return Err(NomakeError::ClusterExists(opts.name).into());
    }

    println!("Creating cluster: {}", opts.name.cyan());

    let kubeconfig = state.kubeconfig(&opts.name);
    if let Err(e) = provision(&cluster, &state, ecr_host.as_deref(), registry.as_ref(), settings) {
        discard_state(&state, &opts.name);
        return Err(e);
    }

    if let (Some(registry), Some(runtime)) = (&registry, runtime) {
        registry.connect(runtime)?;
        registry.publish(&kubeconfig);
        println!(
            "Push images to {} to use them in the cluster",
            registry.host_address().cyan()
        );
    }

    println!();
    println!("To use this cluster, run:");
    println!("  {}", kubeconfig::export_line(&kubeconfig));

    Ok(())
}

/// Write the state directory and run kind. Anything written here is
/// discarded by the caller when this fails.
fn provision(
    cluster: &KindCluster,
    state: &StateDir,
    ecr_host: Option<&str>,
    registry: Option<&LocalRegistry>,
    settings: &Settings,
) -> Result<()> {
    let name = &cluster.name;
    let dir = state.cluster_dir(name);
    dryrun::exec_unless_dry_run(&format!("mkdir -p {}", dir.display()), || {
        state.create_cluster_dir(name).map(|_| ())
    })?;
    crate::log_info!("Config dir is {}", dir.display());

    let mut config = ClusterConfig::default();

    if let Some(host) = ecr_host {
        let docker_config = state.docker_config(name);
        ecr::write_docker_config(&settings.registry.credential_helper, host, &docker_config)?;
        config.add_mount(&docker_config.to_string_lossy(), KUBELET_DOCKER_CONFIG);
    }

    if let Some(registry) = registry {
        registry.configure(&mut config);
    }

    let config_path = write_kind_config(state, name, &config)?;
    cluster.create(&state.kubeconfig(name), config_path.as_deref())
}

/// Returns the path only when kind needs `--config`
fn write_kind_config(state: &StateDir, name: &str, config: &ClusterConfig) -> Result<Option<PathBuf>> {
    if !config.is_customized() {
        return Ok(None);
    }

    let path = state.kind_config(name);
    let yaml = config.to_yaml()?;
    crate::log_debug!("kind config:\n{}", yaml);

    dryrun::exec_unless_dry_run(&format!("write {}", path.display()), || {
        fs::write(&path, &yaml).with_context(|| format!("Failed to write {}", path.display()))
    })?;

    Ok(Some(path))
}

fn discard_state(state: &StateDir, name: &str) {
    if dryrun::is_dry_run() {
        return;
    }
    if let Err(e) = state.remove_cluster_dir(name) {
        crate::log_warn!("{:#}", e);
    }
}

/// Handle cluster delete command
pub fn delete(name: String, verbose: bool, settings: &Settings) -> Result<()> {
    validate_cluster_name(&name)?;
    let state = StateDir::resolve(settings.defaults.state_dir.as_deref())?;

    let mut cluster = KindCluster::new(&name).with_binary(&settings.kind.binary);
    cluster.set_verbose(verbose);

    println!("Deleting cluster: {}", name.cyan());
    cluster.delete()?;

    if !state.has_cluster(&name) {
        crate::log_debug!("No local state for cluster '{}'", name);
        return Ok(());
    }

    let dir = state.cluster_dir(&name);
    dryrun::exec_unless_dry_run(&format!("rm -rf {}", dir.display()), || {
        state.remove_cluster_dir(&name)
    })
}

/// Handle list command
pub fn list(wide: bool, settings: &Settings) -> Result<()> {
    let state = StateDir::resolve(settings.defaults.state_dir.as_deref())?;

    for cluster in state.clusters()? {
        if wide {
            let server = kubeconfig::load(&state.kubeconfig(&cluster))
                .ok()
                .and_then(|kc| kubeconfig::api_server(&kc))
                .unwrap_or_else(|| "-".to_string());
            println!("{}\t{}", cluster, server);
        } else {
            println!("{}", cluster);
        }
    }

    Ok(())
}

/// Handle clean command
pub fn clean(force: bool, settings: &Settings) -> Result<()> {
    let state = StateDir::resolve(settings.defaults.state_dir.as_deref())?;
    crate::log_debug!("Looking for stale clusters in {}", state.root().display());
    let running = KindCluster::list_all_with(&settings.kind.binary)?;
    let known = state.clusters()?;

    for cluster in stale_clusters(&known, &running) {
        let dir = state.cluster_dir(cluster);
        if force {
            println!("Removing {}", dir.display());
            dryrun::exec_unless_dry_run(&format!("rm -rf {}", dir.display()), || {
                state.remove_cluster_dir(cluster)
            })?;
        } else {
            println!("Not removing {}. Use --force", dir.display());
        }
    }

    Ok(())
}

/// Clusters with local state that kind no longer knows about
fn stale_clusters<'a>(known: &'a [String], running: &[String]) -> Vec<&'a str> {
    known
        .iter()
        .filter(|c| !running.contains(c))
        .map(String::as_str)
        .collect()
}
