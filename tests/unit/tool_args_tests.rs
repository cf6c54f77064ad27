//! Unit tests for tool identities and argument building.
//!
//! Validates that:
//! - Each supported tool yields its fixed flag sequence with the message
//!   passed through verbatim.
//! - The continuation flag is appended exactly when a token is present.
//! - Unknown tool names are rejected before anything is spawned.

use ai_cli_bridge::models::ToolKind;
use ai_cli_bridge::AppError;

#[test]
fn claude_args_without_continuation() {
    let inv = ToolKind::Claude.invocation("hello world", None);
    assert_eq!(inv.program, "claude");
    assert_eq!(inv.args, vec!["-p", "hello world", "--output-format", "text"]);
}

#[test]
fn claude_args_with_continuation_append_one_flag() {
    let inv = ToolKind::Claude.invocation("follow up", Some("session-123"));
    assert_eq!(
        inv.args,
        vec!["-p", "follow up", "--output-format", "text", "--continue"]
    );
}

#[test]
fn gemini_args_use_prompt_flag() {
    let inv = ToolKind::Gemini.invocation("test prompt", None);
    assert_eq!(inv.program, "gemini");
    assert_eq!(inv.args, vec!["-p", "test prompt", "--output-format", "text"]);
}

#[test]
fn gemini_ignores_continuation_token() {
    let with = ToolKind::Gemini.invocation("msg", Some("token"));
    let without = ToolKind::Gemini.invocation("msg", None);
    assert_eq!(with, without);
}

#[test]
fn codex_args_use_exec_subcommand() {
    let inv = ToolKind::Codex.invocation("write a function", None);
    assert_eq!(inv.program, "codex");
    assert_eq!(
        inv.args,
        vec!["exec", "--skip-git-repo-check", "write a function"]
    );
}

#[test]
fn message_special_characters_pass_through_verbatim() {
    let msg = "explain \"this\" and 'that' & more <stuff> | $HOME; rm -rf /";
    let inv = ToolKind::Claude.invocation(msg, None);
    assert_eq!(inv.args[0], "-p");
    assert_eq!(inv.args[1], msg);
}

#[test]
fn from_name_resolves_all_supported_tools() {
    for tool in ToolKind::ALL {
        assert_eq!(ToolKind::from_name(tool.name()).ok(), Some(tool));
    }
}

#[test]
fn from_name_rejects_unknown_tool() {
    let err = ToolKind::from_name("copilot").unwrap_err();
    assert!(matches!(err, AppError::UnknownTool(_)));
    assert!(err.to_string().contains("no mapping"));
}

#[test]
fn package_mapping_matches_npm_registry_names() {
    assert_eq!(ToolKind::Claude.package(), "@anthropic-ai/claude-code");
    assert_eq!(ToolKind::Gemini.package(), "@google/gemini-cli");
    assert_eq!(ToolKind::Codex.package(), "@openai/codex");
}
