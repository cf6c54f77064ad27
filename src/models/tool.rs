//! Supported assistant tools and their invocation conventions.
//!
//! The supported set is fixed at compile time. Each tool maps to an
//! executable command, an npm package for installation, and a fixed
//! argument convention for one-shot prompts. Message text is passed
//! through as a single argv entry — never shell-escaped or rewritten.

use std::fmt::{Display, Formatter};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{AppError, Result};

/// Identity of a supported external AI assistant CLI.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// Anthropic Claude Code.
    Claude,
    /// Google Gemini CLI.
    Gemini,
    /// OpenAI Codex CLI.
    Codex,
}

impl ToolKind {
    /// Every supported tool, in display order.
    pub const ALL: [Self; 3] = [Self::Claude, Self::Gemini, Self::Codex];

    /// Lowercase identity string used in session keys and UI events.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Gemini => "gemini",
            Self::Codex => "codex",
        }
    }

    /// Executable command name on the search path.
    #[must_use]
    pub fn command(self) -> &'static str {
        // Command and identity coincide for all currently supported tools.
        self.name()
    }

    /// npm package installed by the global-install command.
    #[must_use]
    pub fn package(self) -> &'static str {
        match self {
            Self::Claude => "@anthropic-ai/claude-code",
            Self::Gemini => "@google/gemini-cli",
            Self::Codex => "@openai/codex",
        }
    }

    /// Resolve a tool identity from its lowercase name.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnknownTool` for any name outside the supported set.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.name() == name)
            .ok_or_else(|| AppError::UnknownTool(format!("no mapping for `{name}`")))
    }

    /// Build the spawn request for a one-shot prompt against this tool.
    ///
    /// Each tool has a fixed flag convention (prompt flag + plain-text
    /// output flag). A continuation token appends the tool's continuation
    /// flag; the token itself is an opaque presence marker and is not
    /// forwarded.
    #[must_use]
    pub fn invocation(self, message: &str, continuation: Option<&str>) -> Invocation {
        let args = match self {
            Self::Claude => {
                let mut args = vec![
                    "-p".to_owned(),
                    message.to_owned(),
                    "--output-format".to_owned(),
                    "text".to_owned(),
                ];
                if continuation.is_some() {
                    args.push("--continue".to_owned());
                }
                args
            }
            Self::Gemini => vec![
                "-p".to_owned(),
                message.to_owned(),
                "--output-format".to_owned(),
                "text".to_owned(),
            ],
            Self::Codex => vec![
                "exec".to_owned(),
                "--skip-git-repo-check".to_owned(),
                message.to_owned(),
            ],
        };

        Invocation {
            program: self.command().to_owned(),
            args,
        }
    }
}

impl Display for ToolKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An exact spawn request: program plus argv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable name or path.
    pub program: String,
    /// Arguments passed verbatim to the process.
    pub args: Vec<String>,
}
