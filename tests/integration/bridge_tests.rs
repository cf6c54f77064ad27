//! Integration tests for the presentation-boundary facade.

use tokio::sync::mpsc;

use ai_cli_bridge::bridge::{Bridge, UiEvent};
use ai_cli_bridge::models::ToolKind;
use ai_cli_bridge::platform::Platform;
use ai_cli_bridge::GlobalConfig;

fn bridge() -> (Bridge, mpsc::UnboundedReceiver<UiEvent>) {
    let config = GlobalConfig {
        working_dir: Some(std::env::temp_dir()),
        ..GlobalConfig::default()
    };
    let (tx, rx) = mpsc::unbounded_channel();
    (Bridge::new(&config, tx).unwrap(), rx)
}

#[tokio::test]
async fn platform_identifier_matches_host() {
    let (bridge, _rx) = bridge();
    assert_eq!(bridge.platform(), Platform::current().identifier());
}

#[tokio::test]
async fn stop_process_without_sessions_is_a_no_op() {
    let (bridge, _rx) = bridge();
    bridge.stop_process(ToolKind::Claude).await;
    bridge.shutdown().await;
}

#[cfg(unix)]
#[tokio::test]
async fn prerequisites_report_does_not_fault() {
    let (bridge, _rx) = bridge();
    let report = bridge.check_prerequisites().await;

    // node may or may not exist on the test host; the shape must hold.
    if !report.node {
        assert_eq!(report.node_version, None);
    }
    match Platform::current() {
        Platform::MacOs => assert!(report.homebrew.is_some()),
        Platform::Linux | Platform::Windows => assert_eq!(report.homebrew, None),
    }
}

#[test]
fn ui_events_serialize_as_tagged_json() {
    let chunk = UiEvent::StreamChunk {
        tool: ToolKind::Claude,
        chunk: "hello\n".to_owned(),
    };
    let json = serde_json::to_value(&chunk).unwrap();
    assert_eq!(json["event"], "stream-chunk");
    assert_eq!(json["tool"], "claude");
    assert_eq!(json["chunk"], "hello\n");

    let end = UiEvent::StreamEnd {
        tool: ToolKind::Gemini,
    };
    let json = serde_json::to_value(&end).unwrap();
    assert_eq!(json["event"], "stream-end");
    assert_eq!(json["tool"], "gemini");
}
