#![forbid(unsafe_code)]

//! `ai-cli-bridge` — command-line front end for the bridge library.
//!
//! Exposes the same boundary operations a desktop presentation layer
//! would call: prerequisite checks, tool probing and installation, and
//! streamed one-shot chat invocations.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use ai_cli_bridge::bridge::{Bridge, UiEvent};
use ai_cli_bridge::config::GlobalConfig;
use ai_cli_bridge::models::ToolKind;
use ai_cli_bridge::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "ai-cli-bridge", about = "Detect, install, and drive AI assistant CLI tools", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Print the host platform identifier.
    Platform,
    /// Check node, npm, and homebrew prerequisites.
    Doctor,
    /// Check whether a tool is installed.
    Check {
        /// Tool to probe.
        tool: ToolKind,
    },
    /// Install a tool through npm; no-op when already present.
    Install {
        /// Tool to install.
        tool: ToolKind,
    },
    /// Install Node.js through Homebrew; no-op when already present.
    InstallNode,
    /// Open the guided Homebrew installer in a terminal (macOS only).
    InstallHomebrew,
    /// Run one message through a tool, streaming its output.
    Send {
        /// Tool to drive.
        tool: ToolKind,
        /// Message text, passed to the tool verbatim.
        message: String,
        /// Continue the tool's prior conversation context.
        #[arg(long)]
        continue_session: bool,
        /// Emit push events as JSON lines instead of raw text.
        #[arg(long)]
        json: bool,
    },
    /// Open an interactive terminal running the tool (for authentication).
    Open {
        /// Tool to open.
        tool: ToolKind,
    },
    /// Open a URL in the default browser.
    Url {
        /// URL to open.
        url: String,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let config = match args.config {
        Some(ref path) => GlobalConfig::load(path)?,
        None => GlobalConfig::default(),
    };

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let bridge = Bridge::new(&config, event_tx)?;

    match args.command {
        CliCommand::Platform => println!("{}", bridge.platform()),
        CliCommand::Doctor => print_json(&bridge.check_prerequisites().await)?,
        CliCommand::Check { tool } => print_json(&bridge.check_tool(tool).await)?,
        CliCommand::Install { tool } => {
            let outcome = bridge.install_tool(tool).await;
            print_json(&outcome)?;
            if !outcome.success {
                std::process::exit(1);
            }
        }
        CliCommand::InstallNode => {
            let outcome = bridge.install_node().await;
            print_json(&outcome)?;
            if !outcome.success {
                std::process::exit(1);
            }
        }
        CliCommand::InstallHomebrew => {
            let outcome = bridge.install_homebrew().await;
            print_json(&outcome)?;
            if !outcome.success {
                std::process::exit(1);
            }
        }
        CliCommand::Send {
            tool,
            message,
            continue_session,
            json,
        } => {
            return run_send(bridge, event_rx, tool, &message, continue_session, json).await;
        }
        CliCommand::Open { tool } => {
            let outcome = bridge.open_external_tool(tool).await;
            print_json(&outcome)?;
        }
        CliCommand::Url { url } => bridge.open_url(&url).await,
    }

    bridge.shutdown().await;
    Ok(())
}

/// Stream one message through a tool, printing push events as they arrive.
///
/// Ctrl-C stops the in-flight session; the command then resolves with the
/// cancelled outcome.
async fn run_send(
    bridge: Bridge,
    mut event_rx: mpsc::UnboundedReceiver<UiEvent>,
    tool: ToolKind,
    message: &str,
    continue_session: bool,
    json: bool,
) -> Result<()> {
    let printer = tokio::spawn(async move {
        use std::io::Write;

        while let Some(event) = event_rx.recv().await {
            if json {
                if let Ok(line) = serde_json::to_string(&event) {
                    println!("{line}");
                }
            } else if let UiEvent::StreamChunk { chunk, .. } = event {
                print!("{chunk}");
                std::io::stdout().flush().ok();
            }
        }
    });

    let continuation = continue_session.then_some("continue");
    let outcome = {
        let send = bridge.send_message(tool, message, continuation);
        tokio::pin!(send);

        tokio::select! {
            outcome = &mut send => outcome,
            _ = tokio::signal::ctrl_c() => {
                info!(tool = tool.name(), "interrupt received, stopping session");
                bridge.stop_process(tool).await;
                send.await
            }
        }
    };

    bridge.shutdown().await;
    // Dropping the bridge closes the event sink so the printer can drain.
    drop(bridge);
    printer.await.ok();

    if json {
        print_json(&outcome)?;
    } else if let Some(ref error) = outcome.error {
        eprintln!("error: {error}");
    }

    if outcome.success {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text =
        serde_json::to_string_pretty(value).map_err(|err| AppError::Io(err.to_string()))?;
    println!("{text}");
    Ok(())
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = fmt().with_env_filter(env_filter).with_writer(std::io::stderr);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
