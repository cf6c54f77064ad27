//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Caller requested a tool outside the supported set.
    UnknownTool(String),
    /// The OS could not create a child process.
    Spawn(String),
    /// Session lifecycle violation (e.g. a second concurrent session for one tool).
    Session(String),
    /// A helper shell command failed to execute.
    Command(String),
    /// A bounded helper operation exceeded its time budget.
    Timeout(String),
    /// File-system or I/O operation failure.
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::UnknownTool(msg) => write!(f, "unknown tool: {msg}"),
            Self::Spawn(msg) => write!(f, "spawn: {msg}"),
            Self::Session(msg) => write!(f, "session: {msg}"),
            Self::Command(msg) => write!(f, "command: {msg}"),
            Self::Timeout(msg) => write!(f, "timeout: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
