//! Kubectl wrapper utilities

use anyhow::Result;
use std::path::Path;
use std::process::Command;

use crate::utils::{dryrun, exec};

fn kubectl(kubeconfig: Option<&Path>) -> Command {
    let mut cmd = Command::new("kubectl");

    if let Some(kc) = kubeconfig {
        cmd.env("KUBECONFIG", kc);
    }

    cmd
}

/// Apply a YAML manifest from string
pub fn apply_yaml(yaml: &str, kubeconfig: Option<&Path>) -> Result<()> {
    let mut cmd = kubectl(kubeconfig);
    cmd.args(["apply", "-f", "-"]);

    dryrun::exec_unless_dry_run(&exec::describe(&cmd), || {
        let out = exec::query_with_stdin(&mut cmd, "kubectl", yaml)?;
        crate::log_debug!("{}", out.trim_end());
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kubeconfig_is_passed_through_env() {
        let cmd = kubectl(Some(Path::new("/s/dev/kubeconfig")));
        let env: Vec<_> = cmd.get_envs().collect();
        assert_eq!(env.len(), 1);
        assert_eq!(env[0].0, "KUBECONFIG");
        assert_eq!(env[0].1.unwrap(), "/s/dev/kubeconfig");
    }

    #[test]
    fn test_no_kubeconfig_leaves_env_alone() {
        assert_eq!(kubectl(None).get_envs().count(), 0);
    }
}
