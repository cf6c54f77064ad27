//! Process session manager: spawn, stream, cancel.
//!
//! Each session is one invocation of a tool against a single message,
//! tracked from spawn to termination. The manager owns the live-session
//! registry; there is no ambient global state. Consumers receive a
//! single-consumer event stream: zero or more [`SessionEvent::Chunk`]
//! fragments in child-output order, terminated by exactly one
//! [`SessionEvent::Ended`] completion marker. A cancelled session emits
//! nothing further.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::models::{Invocation, InvocationResult, ToolKind};
use crate::platform::{execution_env, home_dir, Platform};
use crate::{AppError, Result};

/// Buffered event capacity per session stream.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// One element of a session's output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A stdout fragment, forwarded in arrival order before termination.
    Chunk(String),
    /// Completion marker carrying the terminal result. Always last.
    Ended(InvocationResult),
}

/// Single-consumer handle to one in-flight session.
#[derive(Debug)]
pub struct SessionHandle {
    /// Registry key: tool identity plus start timestamp.
    pub key: String,
    /// Ordered event stream; closes after the completion marker.
    pub events: mpsc::Receiver<SessionEvent>,
}

#[derive(Debug)]
struct SessionEntry {
    cancel: CancellationToken,
}

type Registry = Arc<Mutex<HashMap<String, SessionEntry>>>;

/// Owns the live-session registry and drives child processes.
#[derive(Debug, Clone)]
pub struct SessionManager {
    platform: Platform,
    working_dir: PathBuf,
    registry: Registry,
}

impl SessionManager {
    /// Create a manager for `platform`.
    ///
    /// Sessions run in `working_dir` when given, otherwise in the user's
    /// home directory.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if no working directory can be resolved.
    pub fn new(platform: Platform, working_dir: Option<PathBuf>) -> Result<Self> {
        let working_dir = match working_dir {
            Some(dir) => dir,
            None => home_dir()?,
        };

        Ok(Self {
            platform,
            working_dir,
            registry: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Start a one-shot prompt session for `tool`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if a session for this tool is already
    /// active, or `AppError::Spawn` if the child process cannot be created.
    pub async fn start(
        &self,
        tool: ToolKind,
        message: &str,
        continuation: Option<&str>,
    ) -> Result<SessionHandle> {
        self.start_invocation(tool, tool.invocation(message, continuation))
            .await
    }

    /// Start a session for a prebuilt invocation.
    ///
    /// # Errors
    ///
    /// Same contract as [`SessionManager::start`].
    pub async fn start_invocation(
        &self,
        tool: ToolKind,
        invocation: Invocation,
    ) -> Result<SessionHandle> {
        let mut registry = self.registry.lock().await;

        // At most one active session per tool. The registry key embeds the
        // start timestamp, but cancellation groups by identity prefix, so a
        // second concurrent session would be unreachable on its own.
        let prefix = format!("{}-", tool.name());
        if registry.keys().any(|key| key.starts_with(&prefix)) {
            return Err(AppError::Session(format!(
                "a session for {tool} is already active"
            )));
        }

        let key = format!("{}-{}", tool.name(), Utc::now().timestamp_millis());
        let Invocation { program, args } = invocation;

        let mut cmd = Command::new(&program);
        cmd.args(&args)
            .current_dir(&self.working_dir)
            .env_clear()
            .envs(execution_env(self.platform))
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|err| AppError::Spawn(format!("failed to spawn {}: {err}", tool.command())))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AppError::Spawn("failed to capture child stdout".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| AppError::Spawn("failed to capture child stderr".into()))?;

        let cancel = CancellationToken::new();
        registry.insert(
            key.clone(),
            SessionEntry {
                cancel: cancel.clone(),
            },
        );
        drop(registry);

        info!(
            key,
            pid = child.id().unwrap_or(0),
            program,
            "session started"
        );

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        tokio::spawn(drive_session(
            Arc::clone(&self.registry),
            key.clone(),
            child,
            stdout,
            stderr,
            tx,
            cancel,
        ));

        Ok(SessionHandle { key, events: rx })
    }

    /// Forcibly terminate every live session for `tool`.
    ///
    /// Best-effort: the termination signal is fired and the entries are
    /// removed immediately, without waiting for confirmation and without
    /// distinguishing an already-exited process from a killed one.
    pub async fn cancel(&self, tool: ToolKind) {
        let mut registry = self.registry.lock().await;
        let prefix = format!("{}-", tool.name());
        let keys: Vec<String> = registry
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect();

        for key in keys {
            if let Some(entry) = registry.remove(&key) {
                entry.cancel.cancel();
                info!(key, "session cancelled");
            }
        }
    }

    /// Terminate and deregister every live session. Invoked at teardown.
    pub async fn shutdown_all(&self) {
        let mut registry = self.registry.lock().await;
        for (key, entry) in registry.drain() {
            entry.cancel.cancel();
            info!(key, "session terminated at shutdown");
        }
    }

    /// Snapshot of the live registry keys.
    pub async fn active_keys(&self) -> Vec<String> {
        self.registry.lock().await.keys().cloned().collect()
    }
}

/// Drive one session to termination.
///
/// Forwards stdout fragments as they arrive, accumulates both output
/// streams, and emits the completion marker on process exit. Cancellation
/// kills the child and suppresses all further events; deregistration
/// happens after the marker is sent so `cancel` never observes a session
/// whose stream is still open.
async fn drive_session(
    registry: Registry,
    key: String,
    mut child: Child,
    stdout: ChildStdout,
    stderr: ChildStderr,
    tx: mpsc::Sender<SessionEvent>,
    cancel: CancellationToken,
) {
    let stderr_task = tokio::spawn(collect_stderr(stderr));

    let mut reader = BufReader::new(stdout);
    let mut accumulated = String::new();
    let mut line: Vec<u8> = Vec::new();

    loop {
        line.clear();
        tokio::select! {
            biased;

            () = cancel.cancelled() => {
                kill_and_deregister(&registry, &key, &mut child).await;
                stderr_task.abort();
                return;
            }

            read = reader.read_until(b'\n', &mut line) => match read {
                Ok(0) => break,
                Ok(_) => {
                    let chunk = String::from_utf8_lossy(&line).into_owned();
                    accumulated.push_str(&chunk);
                    if tx.send(SessionEvent::Chunk(chunk)).await.is_err() {
                        // Consumer dropped the stream; treat as cancellation.
                        kill_and_deregister(&registry, &key, &mut child).await;
                        stderr_task.abort();
                        return;
                    }
                }
                Err(err) => {
                    warn!(key, %err, "error reading child stdout");
                    break;
                }
            }
        }
    }

    let status = tokio::select! {
        biased;

        () = cancel.cancelled() => {
            kill_and_deregister(&registry, &key, &mut child).await;
            stderr_task.abort();
            return;
        }

        status = child.wait() => status,
    };

    let stderr_text = stderr_task.await.unwrap_or_default();

    let result = match status {
        Ok(exit) => {
            // Policy carried over from the original shell: a non-zero exit
            // that still produced stdout counts as success.
            if exit.success() || !accumulated.is_empty() {
                InvocationResult {
                    success: true,
                    response: Some(accumulated.trim().to_owned()),
                    error: None,
                    session_key: key.clone(),
                }
            } else {
                let error = if stderr_text.trim().is_empty() {
                    exit.code().map_or_else(
                        || "terminated by signal".to_owned(),
                        |code| format!("exited with code {code}"),
                    )
                } else {
                    stderr_text.trim().to_owned()
                };
                InvocationResult::failure(key.clone(), error)
            }
        }
        Err(err) => {
            warn!(key, %err, "error waiting for child process");
            InvocationResult::failure(key.clone(), format!("wait error: {err}"))
        }
    };

    if cancel.is_cancelled() {
        registry.lock().await.remove(&key);
        return;
    }

    info!(key, success = result.success, "session ended");
    if tx.send(SessionEvent::Ended(result)).await.is_err() {
        warn!(key, "stream consumer gone before completion marker");
    }

    registry.lock().await.remove(&key);
}

async fn collect_stderr(stderr: ChildStderr) -> String {
    let mut buf = Vec::new();
    let mut reader = BufReader::new(stderr);
    if let Err(err) = reader.read_to_end(&mut buf).await {
        warn!(%err, "error reading child stderr");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

async fn kill_and_deregister(registry: &Registry, key: &str, child: &mut Child) {
    if let Err(err) = child.kill().await {
        warn!(key, %err, "failed to kill child process");
    }
    registry.lock().await.remove(key);
}
