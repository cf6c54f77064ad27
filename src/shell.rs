//! Timeout-bounded shell command execution.
//!
//! The [`ShellRunner`] trait is the seam between the probe/installer layer
//! and the operating system. The production implementation runs commands
//! through the platform shell with the augmented execution environment;
//! tests substitute a scripted fake.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::platform::{execution_env, Platform};
use crate::{AppError, Result};

/// Captured output of one helper command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the command exited with status zero.
    pub success: bool,
    /// Captured standard output, lossily decoded.
    pub stdout: String,
    /// Captured standard error, lossily decoded.
    pub stderr: String,
}

/// Executes a single shell command and captures its output.
///
/// Implementations must not raise for a command that runs and fails; a
/// non-zero exit is reported through [`CommandOutput::success`]. Errors are
/// reserved for spawn-level failures and timeouts.
pub trait ShellRunner: Send + Sync {
    /// Run `command` through the shell and capture its output.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Command`](crate::AppError::Command) if the shell cannot be spawned.
    /// Returns [`AppError::Timeout`](crate::AppError::Timeout) if the time budget is exceeded.
    fn run<'a>(
        &'a self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + 'a>>;
}

/// Production [`ShellRunner`] backed by the platform shell.
///
/// Every invocation runs `<shell> -c <command>` (or `cmd.exe /C` on
/// Windows) with the augmented execution environment and a fixed wall-clock
/// timeout.
#[derive(Debug, Clone)]
pub struct SystemShell {
    platform: Platform,
    timeout: Duration,
}

impl SystemShell {
    /// Create a runner for `platform` with the given helper timeout.
    #[must_use]
    pub fn new(platform: Platform, timeout: Duration) -> Self {
        Self { platform, timeout }
    }
}

impl ShellRunner for SystemShell {
    fn run<'a>(
        &'a self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + 'a>> {
        Box::pin(async move {
            debug!(command, "running shell helper command");

            let mut cmd = Command::new(self.platform.shell());
            cmd.arg(self.platform.shell_command_flag())
                .arg(command)
                .env_clear()
                .envs(execution_env(self.platform))
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true);

            let output = tokio::time::timeout(self.timeout, cmd.output())
                .await
                .map_err(|_elapsed| {
                    AppError::Timeout(format!(
                        "helper command exceeded {}s: {command}",
                        self.timeout.as_secs()
                    ))
                })?
                .map_err(|err| AppError::Command(format!("failed to run `{command}`: {err}")))?;

            Ok(CommandOutput {
                success: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        })
    }
}
