//! Result values returned across the presentation boundary.
//!
//! All failure modes collapse into plain serializable values here; no
//! error type crosses the boundary as a fault.

use serde::Serialize;

/// Terminal outcome of one tool invocation.
///
/// Produced exactly once per session, on process exit. A cancelled
/// session never produces one.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct InvocationResult {
    /// Whether the invocation is considered successful.
    pub success: bool,
    /// Full accumulated stdout, trimmed; present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Diagnostic text; present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Registry key of the session that produced this result.
    pub session_key: String,
}

impl InvocationResult {
    /// Build a failure result for a session.
    #[must_use]
    pub fn failure(session_key: String, error: String) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error),
            session_key,
        }
    }
}

/// Installed-state report for one tool.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToolStatus {
    /// Whether the tool's command is present on the search path.
    pub installed: bool,
    /// First line of `--version` output, when retrievable.
    pub version: Option<String>,
}

/// Outcome of an install attempt.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstallOutcome {
    /// Whether the tool is installed after this call.
    pub success: bool,
    /// Version string, the literal `Installed`, or a failure diagnostic.
    pub message: String,
    /// Set when the tool was already present and no install ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_installed: Option<bool>,
    /// Set when a guided installer was opened that the user must finish.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual: Option<bool>,
}

/// Host prerequisite report.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PrereqReport {
    /// Whether `node` is present.
    pub node: bool,
    /// Whether `npm` is present.
    pub npm: bool,
    /// First line of `node --version`, when node is present.
    pub node_version: Option<String>,
    /// Whether `brew` is present; reported on macOS only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homebrew: Option<bool>,
}

/// Boundary response for `send_message`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SendOutcome {
    /// Whether the invocation is considered successful.
    pub success: bool,
    /// Full response text on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Diagnostic text on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Session key, when a session was started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proc_id: Option<String>,
}
