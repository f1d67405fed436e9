//! Subprocess helpers that keep the external tool's exit code

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::process::{Command, Output, Stdio};

use super::dryrun;
use super::errors::NomakeError;

/// Render a command the way a user would type it
pub fn describe(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(cmd.get_args().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}

fn spawn_error(tool: &str, err: io::Error) -> anyhow::Error {
    if err.kind() == io::ErrorKind::NotFound {
        NomakeError::ToolNotFound {
            tool: tool.to_string(),
        }
        .into()
    } else {
        anyhow::Error::new(err).context(format!("Failed to run {}", tool))
    }
}

/// Run a mutating command with inherited stdio. Skipped in dry-run mode.
pub fn run(cmd: &mut Command, tool: &str) -> Result<()> {
    let desc = describe(cmd);
    dryrun::exec_unless_dry_run(&desc, || {
        crate::log_debug!("Running: {}", desc);
        let status = cmd.status().map_err(|e| spawn_error(tool, e))?;
        match NomakeError::from_status(tool, status) {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    })
}

/// Run a mutating command with captured output, replaying its stderr on failure.
/// Skipped in dry-run mode.
pub fn run_quiet(cmd: &mut Command, tool: &str) -> Result<()> {
    let desc = describe(cmd);
    dryrun::exec_unless_dry_run(&desc, || {
        crate::log_debug!("Running: {}", desc);
        let output = cmd
            .stdin(Stdio::null())
            .output()
            .map_err(|e| spawn_error(tool, e))?;
        check_output(tool, output).map(|_| ())
    })
}

/// Run a read-only query and return its stdout. Runs even in dry-run mode.
pub fn query(cmd: &mut Command, tool: &str) -> Result<String> {
    crate::log_debug!("Querying: {}", describe(cmd));
    let output = cmd
        .stdin(Stdio::null())
        .output()
        .map_err(|e| spawn_error(tool, e))?;
    check_output(tool, output)
}

/// Run a command, feed `input` on stdin, and return its stdout
pub fn query_with_stdin(cmd: &mut Command, tool: &str, input: &str) -> Result<String> {
    crate::log_debug!("Querying: {}", describe(cmd));
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| spawn_error(tool, e))?;

    if let Some(mut stdin) = child.stdin.take() {
        // A tool that exits without reading stdin is judged by its exit status
        match stdin.write_all(input.as_bytes()) {
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => {
                return Err(e).with_context(|| format!("Failed to write to {} stdin", tool));
            }
            _ => {}
        }
    }

    let output = child
        .wait_with_output()
        .with_context(|| format!("Failed to wait for {}", tool))?;
    check_output(tool, output)
}

fn check_output(tool: &str, output: Output) -> Result<String> {
    if let Some(err) = NomakeError::from_status(tool, output.status) {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            eprintln!("{}", stderr.trim_end());
        }
        return Err(err.into());
    }

    String::from_utf8(output.stdout).with_context(|| format!("{} produced non-UTF-8 output", tool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::exit_code;

    #[test]
    fn test_describe() {
        let mut cmd = Command::new("kind");
        cmd.args(["create", "cluster", "--name", "dev"]);
        assert_eq!(describe(&cmd), "kind create cluster --name dev");
    }

    #[test]
    fn test_missing_tool_is_classified() {
        let err = query(&mut Command::new("nonexistent-tool-xyz"), "nonexistent-tool-xyz")
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NomakeError>(),
            Some(NomakeError::ToolNotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_is_preserved() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "exit 7"]);
        let err = query(&mut cmd, "sh").unwrap_err();
        assert_eq!(exit_code(&err), 7);
    }

    #[cfg(unix)]
    #[test]
    fn test_query_with_stdin_echoes() {
        let out = query_with_stdin(&mut Command::new("cat"), "cat", "registry.example.com").unwrap();
        assert_eq!(out, "registry.example.com");
    }

    #[cfg(unix)]
    #[test]
    fn test_tool_ignoring_stdin_keeps_exit_code() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "exit 4"]);
        // Larger than a pipe buffer, so the write hits the closed pipe
        let input = "x".repeat(1 << 20);
        let err = query_with_stdin(&mut cmd, "sh", &input).unwrap_err();
        assert_eq!(exit_code(&err), 4);
    }
}
