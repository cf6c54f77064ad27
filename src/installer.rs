//! Idempotent tool installation, host prerequisite checks, and
//! prerequisite remediation.

use tracing::{info, info_span, warn};

use crate::models::{InstallOutcome, PrereqReport, ToolKind, ToolStatus};
use crate::platform::Platform;
use crate::probe::{command_exists, command_version};
use crate::shell::{CommandOutput, ShellRunner};

/// Opens the official Homebrew install script in a fresh Terminal window.
///
/// The script is interactive (sudo prompt, confirmation), so it must run
/// in a real terminal rather than through the helper shell.
pub const HOMEBREW_TERMINAL_COMMAND: &str = "osascript -e 'tell app \"Terminal\" to do script \"/bin/bash -c \\\"$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)\\\"\"'";

/// Report whether a tool is installed, and its version when it is.
pub async fn check_tool(shell: &dyn ShellRunner, platform: Platform, tool: ToolKind) -> ToolStatus {
    let installed = command_exists(shell, platform, tool.command()).await;
    let version = if installed {
        command_version(shell, tool.command()).await
    } else {
        None
    };

    ToolStatus { installed, version }
}

/// Install a tool through the package manager's global-install command.
///
/// Idempotent: when the probe reports the command already present, no
/// install runs and the outcome carries `already_installed`. A successful
/// install whose follow-up version probe fails is still a success, with
/// the literal message `Installed`. Install-command failure surfaces the
/// captured diagnostic text; there is no rollback or retry.
pub async fn install_tool(
    shell: &dyn ShellRunner,
    platform: Platform,
    tool: ToolKind,
) -> InstallOutcome {
    let span = info_span!("install_tool", tool = tool.name());
    let _guard = span.enter();

    if command_exists(shell, platform, tool.command()).await {
        let version = command_version(shell, tool.command())
            .await
            .unwrap_or_else(|| "Installed".to_owned());
        info!(version, "tool already installed");
        return InstallOutcome {
            success: true,
            message: version,
            already_installed: Some(true),
            manual: None,
        };
    }

    let install = format!("npm install -g {}", tool.package());
    match shell.run(&install).await {
        Ok(output) if output.success => {
            let message = command_version(shell, tool.command())
                .await
                .unwrap_or_else(|| "Installed".to_owned());
            info!(message, "tool installed");
            InstallOutcome {
                success: true,
                message,
                already_installed: None,
                manual: None,
            }
        }
        Ok(output) => {
            let diagnostic = failure_diagnostic(&output);
            warn!(diagnostic, "install command failed");
            InstallOutcome {
                success: false,
                message: diagnostic,
                already_installed: None,
                manual: None,
            }
        }
        Err(err) => {
            warn!(%err, "install command could not run");
            InstallOutcome {
                success: false,
                message: err.to_string(),
                already_installed: None,
                manual: None,
            }
        }
    }
}

/// Install Node.js through Homebrew.
///
/// Idempotent like [`install_tool`]: when `node` already resolves, no
/// install runs. Homebrew is the only supported channel; on hosts where
/// `brew` is absent the failure diagnostic is surfaced unchanged.
pub async fn install_node(shell: &dyn ShellRunner, platform: Platform) -> InstallOutcome {
    let span = info_span!("install_node");
    let _guard = span.enter();

    if command_exists(shell, platform, "node").await {
        let message = match command_version(shell, "node").await {
            Some(version) => format!("Node.js already installed: {version}"),
            None => "Node.js already installed".to_owned(),
        };
        info!(message, "node already installed");
        return InstallOutcome {
            success: true,
            message,
            already_installed: Some(true),
            manual: None,
        };
    }

    match shell.run("brew install node").await {
        Ok(output) if output.success => {
            let message = match command_version(shell, "node").await {
                Some(version) => format!("Node.js installed: {version}"),
                None => "Node.js installed".to_owned(),
            };
            info!(message, "node installed");
            InstallOutcome {
                success: true,
                message,
                already_installed: None,
                manual: None,
            }
        }
        Ok(output) => {
            let diagnostic = failure_diagnostic(&output);
            warn!(diagnostic, "node install failed");
            InstallOutcome {
                success: false,
                message: diagnostic,
                already_installed: None,
                manual: None,
            }
        }
        Err(err) => {
            warn!(%err, "node install could not run");
            InstallOutcome {
                success: false,
                message: err.to_string(),
                already_installed: None,
                manual: None,
            }
        }
    }
}

/// Guide a Homebrew installation.
///
/// The official installer is interactive, so on macOS it is opened in a
/// Terminal window for the user to complete; the outcome carries `manual`
/// to signal that the install finishes outside this process. Already
/// present is an idempotent success. Other platforms report failure
/// without side effects.
pub async fn install_homebrew(shell: &dyn ShellRunner, platform: Platform) -> InstallOutcome {
    let span = info_span!("install_homebrew");
    let _guard = span.enter();

    if command_exists(shell, platform, "brew").await {
        info!("homebrew already installed");
        return InstallOutcome {
            success: true,
            message: "Homebrew already installed".to_owned(),
            already_installed: Some(true),
            manual: None,
        };
    }

    if platform != Platform::MacOs {
        return InstallOutcome {
            success: false,
            message: "guided Homebrew install is only available on macOS".to_owned(),
            already_installed: None,
            manual: None,
        };
    }

    match shell.run(HOMEBREW_TERMINAL_COMMAND).await {
        Ok(output) if output.success => {
            info!("homebrew installer opened in terminal");
            InstallOutcome {
                success: true,
                message: "Homebrew installer opened in Terminal. Please complete installation there."
                    .to_owned(),
                already_installed: None,
                manual: Some(true),
            }
        }
        Ok(output) => {
            let diagnostic = failure_diagnostic(&output);
            warn!(diagnostic, "could not open homebrew installer");
            InstallOutcome {
                success: false,
                message: diagnostic,
                already_installed: None,
                manual: None,
            }
        }
        Err(err) => {
            warn!(%err, "could not open homebrew installer");
            InstallOutcome {
                success: false,
                message: err.to_string(),
                already_installed: None,
                manual: None,
            }
        }
    }
}

/// Check host prerequisites: node, npm, and (on macOS) homebrew.
pub async fn check_prerequisites(shell: &dyn ShellRunner, platform: Platform) -> PrereqReport {
    let node = command_exists(shell, platform, "node").await;
    let npm = command_exists(shell, platform, "npm").await;
    let node_version = if node {
        command_version(shell, "node").await
    } else {
        None
    };
    let homebrew = match platform {
        Platform::MacOs => Some(command_exists(shell, platform, "brew").await),
        Platform::Linux | Platform::Windows => None,
    };

    PrereqReport {
        node,
        npm,
        node_version,
        homebrew,
    }
}

fn failure_diagnostic(output: &CommandOutput) -> String {
    if output.stderr.trim().is_empty() {
        output.stdout.trim().to_owned()
    } else {
        output.stderr.trim().to_owned()
    }
}
