//! Boundary operations exposed to the presentation layer.
//!
//! The [`Bridge`] facade converts every failure into a plain result value;
//! no error crosses this boundary as a fault. Streamed output is pushed
//! out-of-band through the [`UiEvent`] sink while `send_message` is in
//! flight, mirroring the request/response + push-event split the
//! presentation layer expects.

use std::process::Stdio;
use std::sync::Arc;

use serde::Serialize;
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::GlobalConfig;
use crate::installer;
use crate::models::{InstallOutcome, Invocation, PrereqReport, SendOutcome, ToolKind, ToolStatus};
use crate::platform::Platform;
use crate::session::{SessionEvent, SessionManager};
use crate::shell::{ShellRunner, SystemShell};
use crate::Result;

/// Out-of-band push event relayed to the presentation layer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum UiEvent {
    /// One stdout fragment, in arrival order, before completion.
    StreamChunk {
        /// Tool the fragment belongs to.
        tool: ToolKind,
        /// Text fragment, forwarded unmodified.
        chunk: String,
    },
    /// Emitted exactly once per session, after the last chunk.
    StreamEnd {
        /// Tool whose stream ended.
        tool: ToolKind,
    },
}

/// Facade over the probe, installer, and session layers.
pub struct Bridge {
    platform: Platform,
    shell: Arc<dyn ShellRunner>,
    sessions: SessionManager,
    events: mpsc::UnboundedSender<UiEvent>,
}

impl Bridge {
    /// Build a bridge for the current platform over the system shell.
    ///
    /// Push events are delivered through `events`; the caller owns the
    /// receiving half.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the session working directory cannot
    /// be resolved.
    pub fn new(config: &GlobalConfig, events: mpsc::UnboundedSender<UiEvent>) -> Result<Self> {
        let platform = Platform::current();
        let shell = Arc::new(SystemShell::new(platform, config.helper_timeout()));
        Self::with_shell(config, platform, shell, events)
    }

    /// Build a bridge over an explicit platform and shell runner.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the session working directory cannot
    /// be resolved.
    pub fn with_shell(
        config: &GlobalConfig,
        platform: Platform,
        shell: Arc<dyn ShellRunner>,
        events: mpsc::UnboundedSender<UiEvent>,
    ) -> Result<Self> {
        Ok(Self {
            platform,
            shell,
            sessions: SessionManager::new(platform, config.working_dir.clone())?,
            events,
        })
    }

    /// Host platform identifier string.
    #[must_use]
    pub fn platform(&self) -> &'static str {
        self.platform.identifier()
    }

    /// Check node / npm / homebrew prerequisites.
    pub async fn check_prerequisites(&self) -> PrereqReport {
        installer::check_prerequisites(self.shell.as_ref(), self.platform).await
    }

    /// Check whether a tool is installed and retrieve its version.
    pub async fn check_tool(&self, tool: ToolKind) -> ToolStatus {
        installer::check_tool(self.shell.as_ref(), self.platform, tool).await
    }

    /// Install a tool; a no-op when it is already present.
    pub async fn install_tool(&self, tool: ToolKind) -> InstallOutcome {
        installer::install_tool(self.shell.as_ref(), self.platform, tool).await
    }

    /// Install Node.js through Homebrew; a no-op when already present.
    pub async fn install_node(&self) -> InstallOutcome {
        installer::install_node(self.shell.as_ref(), self.platform).await
    }

    /// Open the guided Homebrew installer in a terminal (macOS only).
    pub async fn install_homebrew(&self) -> InstallOutcome {
        installer::install_homebrew(self.shell.as_ref(), self.platform).await
    }

    /// Run one message through a tool, relaying output as push events.
    ///
    /// Emits zero or more [`UiEvent::StreamChunk`] events in order, then
    /// exactly one [`UiEvent::StreamEnd`], then resolves with the terminal
    /// outcome. A cancelled session resolves as a failure without a
    /// stream-end event.
    pub async fn send_message(
        &self,
        tool: ToolKind,
        message: &str,
        continuation: Option<&str>,
    ) -> SendOutcome {
        let mut handle = match self.sessions.start(tool, message, continuation).await {
            Ok(handle) => handle,
            Err(err) => {
                return SendOutcome {
                    success: false,
                    response: None,
                    error: Some(err.to_string()),
                    proc_id: None,
                }
            }
        };

        let proc_id = handle.key.clone();
        let mut terminal = None;

        while let Some(event) = handle.events.recv().await {
            match event {
                SessionEvent::Chunk(chunk) => {
                    if self
                        .events
                        .send(UiEvent::StreamChunk { tool, chunk })
                        .is_err()
                    {
                        warn!(tool = tool.name(), "ui event sink closed");
                    }
                }
                SessionEvent::Ended(result) => {
                    if self.events.send(UiEvent::StreamEnd { tool }).is_err() {
                        warn!(tool = tool.name(), "ui event sink closed");
                    }
                    terminal = Some(result);
                }
            }
        }

        match terminal {
            Some(result) => SendOutcome {
                success: result.success,
                response: result.response,
                error: result.error,
                proc_id: Some(proc_id),
            },
            // Stream closed without a marker: the session was cancelled.
            None => SendOutcome {
                success: false,
                response: None,
                error: Some("session cancelled".to_owned()),
                proc_id: Some(proc_id),
            },
        }
    }

    /// Forcibly stop every live session for `tool`.
    pub async fn stop_process(&self, tool: ToolKind) {
        self.sessions.cancel(tool).await;
    }

    /// Terminate every live session. Invoked once at teardown.
    pub async fn shutdown(&self) {
        self.sessions.shutdown_all().await;
    }

    /// Open an interactive terminal running the tool directly.
    ///
    /// Bypasses the streaming path entirely; used for authentication
    /// flows that need a real TTY.
    pub async fn open_external_tool(&self, tool: ToolKind) -> SendOutcome {
        let command = match self.platform {
            Platform::MacOs => format!(
                "osascript -e 'tell application \"Terminal\" to activate' \
                 -e 'tell application \"Terminal\" to do script \"cd ~ && {}\"'",
                tool.command()
            ),
            Platform::Linux => format!(
                "(x-terminal-emulator -e {} >/dev/null 2>&1 &)",
                tool.command()
            ),
            Platform::Windows => format!("start cmd /K {}", tool.command()),
        };

        match self.shell.run(&command).await {
            Ok(output) if output.success => {
                info!(tool = tool.name(), "external terminal opened");
                SendOutcome {
                    success: true,
                    response: None,
                    error: None,
                    proc_id: None,
                }
            }
            Ok(output) => SendOutcome {
                success: false,
                response: None,
                error: Some(output.stderr.trim().to_owned()),
                proc_id: None,
            },
            Err(err) => SendOutcome {
                success: false,
                response: None,
                error: Some(err.to_string()),
                proc_id: None,
            },
        }
    }

    /// Open a URL in the platform's default browser.
    ///
    /// The opener is spawned directly with the URL as a single argv entry;
    /// it never passes through a shell, so quoting characters in the URL
    /// have no effect.
    pub async fn open_url(&self, url: &str) {
        let opener = url_opener(self.platform, url);
        let mut cmd = Command::new(&opener.program);
        cmd.args(&opener.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        match cmd.status().await {
            Ok(status) if status.success() => info!(url, "opened url"),
            Ok(status) => warn!(url, %status, "url opener exited with failure"),
            Err(err) => warn!(url, %err, "failed to run url opener"),
        }
    }
}

/// Opener program and argv for a URL on `platform`.
#[must_use]
pub fn url_opener(platform: Platform, url: &str) -> Invocation {
    let (program, args) = match platform {
        Platform::MacOs => ("open", vec![url.to_owned()]),
        Platform::Linux => ("xdg-open", vec![url.to_owned()]),
        // `start` is a cmd builtin; the empty argument is the window title.
        Platform::Windows => (
            "cmd",
            vec!["/C".to_owned(), "start".to_owned(), String::new(), url.to_owned()],
        ),
    };

    Invocation {
        program: program.to_owned(),
        args,
    }
}
