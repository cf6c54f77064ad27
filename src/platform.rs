//! Host platform detection and execution-environment resolution.
//!
//! The platform variant is selected once at startup; everything else here
//! is a pure function of an environment snapshot so the augmentation rules
//! stay testable for every platform regardless of the build host.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::{AppError, Result};

/// Host platform variant.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Platform {
    /// macOS hosts.
    MacOs,
    /// Linux hosts.
    Linux,
    /// Windows hosts.
    Windows,
}

impl Platform {
    /// Detect the platform the process is running on.
    #[must_use]
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(windows) {
            Self::Windows
        } else {
            Self::Linux
        }
    }

    /// Platform identifier string exposed to the presentation layer.
    #[must_use]
    pub fn identifier(self) -> &'static str {
        match self {
            Self::MacOs => "darwin",
            Self::Linux => "linux",
            Self::Windows => "win32",
        }
    }

    /// Path-list delimiter for the `PATH` variable on this platform.
    #[must_use]
    pub fn path_delimiter(self) -> char {
        match self {
            Self::Windows => ';',
            Self::MacOs | Self::Linux => ':',
        }
    }

    /// Interactive shell used for helper commands.
    ///
    /// Honors the `SHELL` (unix) / `COMSPEC` (windows) override, falling
    /// back to the platform's conventional default.
    #[must_use]
    pub fn shell(self) -> String {
        match self {
            Self::Windows => std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_owned()),
            Self::MacOs => std::env::var("SHELL").unwrap_or_else(|_| "/bin/zsh".to_owned()),
            Self::Linux => std::env::var("SHELL").unwrap_or_else(|_| "/bin/bash".to_owned()),
        }
    }

    /// Flag that makes the shell run a single command string.
    #[must_use]
    pub fn shell_command_flag(self) -> &'static str {
        match self {
            Self::Windows => "/C",
            Self::MacOs | Self::Linux => "-c",
        }
    }

    /// Install directories conventionally missing from a GUI process PATH.
    fn extra_path_dirs(self, home: &std::path::Path) -> Vec<String> {
        match self {
            Self::Windows => vec![
                home.join("AppData")
                    .join("Roaming")
                    .join("npm")
                    .to_string_lossy()
                    .into_owned(),
                "C:\\Program Files\\nodejs".to_owned(),
            ],
            Self::MacOs | Self::Linux => vec![
                "/opt/homebrew/bin".to_owned(),
                "/usr/local/bin".to_owned(),
                home.join(".npm-global/bin").to_string_lossy().into_owned(),
            ],
        }
    }
}

/// Prepend platform-conventional install directories to a `PATH` value.
///
/// The original value is always preserved in full as the suffix; it is
/// never truncated or replaced.
#[must_use]
pub fn augmented_path(platform: Platform, original: &str, home: &std::path::Path) -> String {
    let mut parts = platform.extra_path_dirs(home);
    parts.push(original.to_owned());
    parts.join(&platform.path_delimiter().to_string())
}

/// Snapshot the process environment with an augmented search path.
///
/// Every inherited variable is preserved unchanged except `PATH`, which is
/// replaced by [`augmented_path`] over its current value. Constructed fresh
/// per call; callers must not mutate it after construction.
#[must_use]
pub fn execution_env(platform: Platform) -> HashMap<String, String> {
    let home = dirs::home_dir().unwrap_or_default();
    let mut env: HashMap<String, String> = std::env::vars().collect();
    let original = env.get("PATH").cloned().unwrap_or_default();
    env.insert("PATH".to_owned(), augmented_path(platform, &original, &home));
    env
}

/// The user's home directory, used as the working directory for sessions.
///
/// # Errors
///
/// Returns `AppError::Config` when the home directory cannot be resolved.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::Config("cannot resolve home directory".into()))
}
