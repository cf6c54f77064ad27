//! Unit tests for the presentation-boundary facade over a scripted shell.

use std::sync::Arc;

use tokio::sync::mpsc;

use ai_cli_bridge::bridge::{url_opener, Bridge, UiEvent};
use ai_cli_bridge::models::ToolKind;
use ai_cli_bridge::platform::Platform;
use ai_cli_bridge::GlobalConfig;

use super::support::FakeShell;

fn bridge_over(
    shell: Arc<FakeShell>,
    platform: Platform,
) -> (Bridge, mpsc::UnboundedReceiver<UiEvent>) {
    let config = GlobalConfig {
        working_dir: Some(std::env::temp_dir()),
        ..GlobalConfig::default()
    };
    let (tx, rx) = mpsc::unbounded_channel();
    (Bridge::with_shell(&config, platform, shell, tx).unwrap(), rx)
}

#[tokio::test]
async fn check_tool_goes_through_the_shell_runner_seam() {
    let shell = Arc::new(
        FakeShell::new()
            .ok("which claude", "/usr/local/bin/claude\n")
            .ok("claude --version", "1.2.3\n"),
    );
    let (bridge, _rx) = bridge_over(Arc::clone(&shell), Platform::Linux);

    let status = bridge.check_tool(ToolKind::Claude).await;

    assert!(status.installed);
    assert_eq!(status.version, Some("1.2.3".to_owned()));
    assert_eq!(shell.recorded(), vec!["which claude", "claude --version"]);
}

#[tokio::test]
async fn install_node_is_reachable_through_the_facade() {
    let shell = Arc::new(
        FakeShell::new()
            .ok("which node", "/usr/local/bin/node\n")
            .ok("node --version", "v20.11.1\n"),
    );
    let (bridge, _rx) = bridge_over(Arc::clone(&shell), Platform::MacOs);

    let outcome = bridge.install_node().await;

    assert!(outcome.success);
    assert_eq!(outcome.already_installed, Some(true));
}

#[tokio::test]
async fn open_external_tool_runs_the_linux_terminal_command() {
    let shell = Arc::new(
        FakeShell::new().ok("(x-terminal-emulator -e claude >/dev/null 2>&1 &)", ""),
    );
    let (bridge, _rx) = bridge_over(Arc::clone(&shell), Platform::Linux);

    let outcome = bridge.open_external_tool(ToolKind::Claude).await;

    assert!(outcome.success);
    assert_eq!(
        shell.recorded(),
        vec!["(x-terminal-emulator -e claude >/dev/null 2>&1 &)"]
    );
}

#[tokio::test]
async fn open_external_tool_failure_surfaces_stderr() {
    let shell = Arc::new(FakeShell::new().fail(
        "(x-terminal-emulator -e gemini >/dev/null 2>&1 &)",
        "no terminal emulator\n",
    ));
    let (bridge, _rx) = bridge_over(shell, Platform::Linux);

    let outcome = bridge.open_external_tool(ToolKind::Gemini).await;

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("no terminal emulator"));
}

#[test]
fn url_opener_passes_url_as_a_single_argv_entry() {
    let url = "https://example.com/a'b?q=1&r='2';id";
    let inv = url_opener(Platform::Linux, url);

    assert_eq!(inv.program, "xdg-open");
    assert_eq!(inv.args, vec![url]);
}

#[test]
fn url_opener_programs_match_platform_conventions() {
    assert_eq!(url_opener(Platform::MacOs, "https://x").program, "open");
    assert_eq!(url_opener(Platform::Linux, "https://x").program, "xdg-open");

    let win = url_opener(Platform::Windows, "https://x");
    assert_eq!(win.program, "cmd");
    assert_eq!(win.args.last().map(String::as_str), Some("https://x"));
}
