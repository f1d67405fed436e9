//! ECR pull access through the docker credential helper protocol
//!
//! The helper is asked for credentials (`<helper> get`, registry host on
//! stdin) and the answer is turned into a docker `config.json` that kubelet
//! reads from inside the kind node.

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::json;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::NamedTempFile;

use crate::utils::dryrun;
use crate::utils::errors::NomakeError;
use crate::utils::exec;

/// Answer of `docker-credential-* get`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HelperCredentials {
    #[serde(rename = "ServerURL", default)]
    pub server_url: Option<String>,
    pub username: String,
    pub secret: String,
}

/// Normalize a registry host given on the command line
pub fn normalize_host(host: &str) -> Result<String, NomakeError> {
    let host = host.trim().trim_end_matches('/');

    if host.is_empty() {
        return Err(NomakeError::InvalidArgument(
            "--ecr needs a registry host".to_string(),
        ));
    }
    if host.contains("://") {
        return Err(NomakeError::InvalidArgument(format!(
            "--ecr expects a bare registry host, not a URL: {}",
            host
        )));
    }
    if host.chars().any(char::is_whitespace) {
        return Err(NomakeError::InvalidArgument(format!(
            "registry host '{}' contains whitespace",
            host
        )));
    }

    Ok(host.to_string())
}

/// Ask the credential helper for the registry's credentials
pub fn fetch_credentials(helper: &str, host: &str) -> Result<HelperCredentials> {
    crate::log_info!("Requesting credentials for {} from {}", host, helper);

    let mut cmd = Command::new(helper);
    cmd.arg("get");
    let out = exec::query_with_stdin(&mut cmd, helper, host)?;

    parse_credentials(&out).with_context(|| format!("Unexpected output from {}", helper))
}

fn parse_credentials(out: &str) -> Result<HelperCredentials> {
    Ok(serde_json::from_str(out.trim())?)
}

/// Docker `config.json` granting pull access to `host`
pub fn docker_config(host: &str, creds: &HelperCredentials) -> String {
    let auth = STANDARD.encode(format!("{}:{}", creds.username, creds.secret));

    json!({
        "auths": {
            host: {
                "auth": auth
            }
        }
    })
    .to_string()
}

/// Fetch credentials and write the docker config to `path`
pub fn write_docker_config(helper: &str, host: &str, path: &Path) -> Result<()> {
    dryrun::exec_unless_dry_run(
        &format!("{} get <<< {} > {}", helper, host, path.display()),
        || {
            let creds = fetch_credentials(helper, host)?;
            if let Some(server) = &creds.server_url {
                crate::log_debug!("Credential helper answered for {}", server);
            }

            write_private(path, &docker_config(host, &creds))?;
            crate::log_info!("Registry credentials written to {}", path.display());
            Ok(())
        },
    )
}

/// Replace `path` with a file only the owner can read (0600 on unix)
fn write_private(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create a file in {}", dir.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
