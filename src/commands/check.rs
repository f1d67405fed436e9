//! `nomake check`: are the external tools installed?

use anyhow::{Result, anyhow};
use colored::Colorize;

use crate::config::settings::Settings;
use crate::utils::{CommonPrereqs, ContainerRuntime, Prerequisite};

const REQUIRED: &str = "required";

/// Handle check command. Only kind is required; the rest gate optional flags.
pub fn check(settings: &Settings) -> Result<()> {
    crate::log_info!("Checking prerequisites...");

    let kind = CommonPrereqs::kind(&settings.kind.binary);
    let helper = CommonPrereqs::credential_helper(&settings.registry.credential_helper);
    let kubectl = CommonPrereqs::kubectl();
    let purposes = [
        (kind.name(), REQUIRED),
        (helper.name(), "needed for --ecr"),
        (kubectl.name(), "needed for --use-local-registry"),
    ];

    let (found, missing) = CommonPrereqs::check_all(&[&kind, &helper, &kubectl]);
    for line in report_lines(&found, &missing, &purposes) {
        println!("{}", line);
    }

    match ContainerRuntime::detect() {
        Ok(runtime) => println!("  {} {}", "✓".green(), runtime),
        Err(_) => println!(
            "  {} docker/podman ({})",
            "⚠".yellow(),
            "needed for --use-local-registry"
        ),
    }

    if let Some((name, hint)) = missing.iter().find(|(name, _)| name == kind.name()) {
        return Err(anyhow!("Required tool '{}' not found. {}", name, hint));
    }

    println!("{}", "All required tools found".green());
    Ok(())
}

fn report_lines(
    found: &[String],
    missing: &[(String, String)],
    purposes: &[(&str, &str)],
) -> Vec<String> {
    let purpose_of = |name: &str| {
        purposes
            .iter()
            .find(|(tool, _)| *tool == name)
            .map_or(REQUIRED, |(_, purpose)| *purpose)
    };

    let mut lines: Vec<String> = found
        .iter()
        .map(|name| format!("  {} {}", "✓".green(), name))
        .collect();
    lines.extend(missing.iter().map(|(name, hint)| {
        format!("  {} {} ({}). {}", "✗".red(), name, purpose_of(name), hint)
    }));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lines_name_purpose_of_missing_tools() {
        let found = vec!["kind".to_string()];
        let missing = vec![(
            "docker-credential-ecr-login".to_string(),
            "Install it".to_string(),
        )];
        let purposes = [
            ("kind", REQUIRED),
            ("docker-credential-ecr-login", "needed for --ecr"),
        ];

        let lines = report_lines(&found, &missing, &purposes);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("kind"));
        assert!(lines[1].contains("docker-credential-ecr-login (needed for --ecr). Install it"));
    }

    #[test]
    fn test_missing_kind_fails_check() {
        let mut settings = Settings::default();
        settings.kind.binary = "nonexistent-kind-xyz".to_string();

        let err = check(&settings).unwrap_err();
        assert!(err.to_string().contains("nonexistent-kind-xyz"));
    }
}
