//! Read-only presence and version probes for external executables.

use tracing::debug;

use crate::platform::Platform;
use crate::shell::ShellRunner;

/// Check whether `command` resolves on the search path.
///
/// Runs the platform's locate command (`which` / `where`). Absence is a
/// normal `false` result — a missing command never surfaces as an error.
pub async fn command_exists(shell: &dyn ShellRunner, platform: Platform, command: &str) -> bool {
    let locate = match platform {
        Platform::Windows => format!("where {command}"),
        Platform::MacOs | Platform::Linux => format!("which {command}"),
    };

    match shell.run(&locate).await {
        Ok(output) => output.success,
        Err(err) => {
            debug!(command, %err, "locate probe failed");
            false
        }
    }
}

/// Retrieve the first line of `command --version`, trimmed.
///
/// Returns `None` when the command is missing, errors, or produces no
/// output. A single attempt only; "not installed" and "installed but
/// erroring" are not distinguished.
pub async fn command_version(shell: &dyn ShellRunner, command: &str) -> Option<String> {
    match shell.run(&format!("{command} --version")).await {
        Ok(output) if output.success => output
            .stdout
            .trim()
            .lines()
            .next()
            .map(std::borrow::ToOwned::to_owned),
        Ok(_) => None,
        Err(err) => {
            debug!(command, %err, "version probe failed");
            None
        }
    }
}
