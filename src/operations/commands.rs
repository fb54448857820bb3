//! Shell command execution with proper working directory context

use crate::error::DevkitError;
use anyhow::{Context as _, Result};
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

/// Run `command` through the platform shell in `working_dir`
///
/// The child inherits stdio and the process environment, overlaid with `env`.
///
/// # Errors
///
/// - [`DevkitError::Filesystem`] if `working_dir` does not exist
/// - [`DevkitError::Command`] if the command is empty, cannot start, or exits non-zero
pub fn execute_command(
    command: &str,
    working_dir: &Path,
    env: &BTreeMap<String, String>,
) -> Result<()> {
    if command.trim().is_empty() {
        return Err(DevkitError::command("Empty command").into());
    }

    if !working_dir.is_dir() {
        return Err(DevkitError::filesystem(format!(
            "Working directory does not exist: {}",
            working_dir.display()
        ))
        .into());
    }

    let (shell, flag) = shell_invocation();
    let status = Command::new(shell)
        .arg(flag)
        .arg(command)
        .current_dir(working_dir)
        .envs(env)
        .status()
        .with_context(|| format!("Failed to start command: {command}"))?;

    if !status.success() {
        return Err(DevkitError::command(format!(
            "Command failed with exit code {}: {}\nWorking directory: {}",
            status
                .code()
                .map_or_else(|| "unknown".to_owned(), |code| code.to_string()),
            command,
            working_dir.display()
        ))
        .into());
    }

    Ok(())
}

/// Shell program and its "run this string" flag for the current platform
const fn shell_invocation() -> (&'static str, &'static str) {
    if cfg!(target_os = "windows") {
        ("cmd", "/C")
    } else {
        ("sh", "-c")
    }
}

/// Flag commands that deserve a second look before they run
#[must_use]
pub fn analyze_command_safety(command: &str) -> Vec<String> {
    let lower = command.to_lowercase();
    let mut issues = Vec::new();

    let destructive = ["rm -rf", "rm -f", "mkfs", "dd if=", "sudo rm", "drop database"];
    if let Some(pattern) = destructive.iter().find(|pattern| lower.contains(*pattern)) {
        issues.push(format!("Contains potentially destructive command: {pattern}"));
    }

    if ["curl ", "wget ", "| sh", "| bash"]
        .iter()
        .any(|pattern| lower.contains(pattern))
    {
        issues.push("Command may download and run remote code".to_owned());
    }

    if lower.starts_with("sudo ") || lower.contains(" sudo ") {
        issues.push("Command asks for elevated privileges".to_owned());
    }

    issues
}
