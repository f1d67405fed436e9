//! Error types with exit codes and actionable suggestions

use colored::Colorize;
use std::process::ExitStatus;
use thiserror::Error;

/// Exit code used when arguments are rejected (matches clap's usage errors)
pub const EXIT_USAGE: i32 = 2;

/// Exit code for every failure that is not a passthrough
pub const EXIT_FAILURE: i32 = 1;

/// Failures nomake knows how to classify
#[derive(Error, Debug)]
pub enum NomakeError {
    #[error("{tool} exited with status {code}")]
    ToolFailed { tool: String, code: i32 },

    #[error("{tool} was terminated by a signal")]
    ToolKilled { tool: String },

    #[error("Required tool '{tool}' not found")]
    ToolNotFound { tool: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No state found for cluster '{0}'")]
    UnknownCluster(String),

    #[error("Kind cluster '{0}' already exists")]
    ClusterExists(String),

    #[error("Registry container '{0}' is not running")]
    RegistryNotRunning(String),
}

impl NomakeError {
    /// Classify a finished subprocess. Success is not an error.
    pub fn from_status(tool: &str, status: ExitStatus) -> Option<Self> {
        if status.success() {
            return None;
        }

        Some(match status.code() {
            Some(code) => NomakeError::ToolFailed {
                tool: tool.to_string(),
                code,
            },
            None => NomakeError::ToolKilled {
                tool: tool.to_string(),
            },
        })
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // A tool reporting 0 through this path would hide the failure
            NomakeError::ToolFailed { code, .. } if *code != 0 => *code,
            NomakeError::InvalidArgument(_) => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }

    /// Hints printed under the error message
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            NomakeError::ToolFailed { tool, .. } => vec![
                format!("Review the {} output above", tool),
                "Run with -v to stream external tool output".to_string(),
            ],
            NomakeError::ToolKilled { .. } => Vec::new(),
            NomakeError::ToolNotFound { tool } => vec![
                format!("Ensure '{}' is installed and in your PATH", tool),
                "Run 'nomake check' to see all prerequisites".to_string(),
            ],
            NomakeError::InvalidArgument(_) => {
                vec!["Run 'nomake --help' for usage".to_string()]
            }
            NomakeError::UnknownCluster(name) => vec![
                format!("Create it with: nomake create --name {}", name),
                "List known clusters with: nomake list".to_string(),
            ],
            NomakeError::ClusterExists(name) => vec![
                format!("Delete it first with: nomake delete --name {}", name),
                "Pick a different name with --name".to_string(),
            ],
            NomakeError::RegistryNotRunning(registry) => vec![format!(
                "Start it with: docker run -d --restart=always -p 127.0.0.1:5000:5000 --name {} registry:2",
                registry
            )],
        }
    }

    /// Print the hints to stderr, if there are any
    pub fn print_suggestions(&self) {
        let suggestions = self.suggestions();
        if suggestions.is_empty() {
            return;
        }

        eprintln!();
        eprintln!("{}", "Suggestions:".yellow().bold());
        for suggestion in &suggestions {
            eprintln!("  {} {}", "→".blue(), suggestion);
        }
    }
}

/// Exit code for any error bubbled up to `main`
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<NomakeError>()
        .map(NomakeError::exit_code)
        .unwrap_or(EXIT_FAILURE)
}

/// Full message (context chain included) and the classified cause, if any
pub fn describe(err: &anyhow::Error) -> (String, Option<&NomakeError>) {
    (format!("{:#}", err), err.downcast_ref::<NomakeError>())
}

/// Print any error bubbled up to `main`
pub fn report(err: &anyhow::Error) {
    let (message, known) = describe(err);
    crate::log_error!("{}", message);
    if let Some(known) = known {
        known.print_suggestions();
    }
}
