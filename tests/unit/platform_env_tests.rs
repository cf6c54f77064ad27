//! Unit tests for execution-environment resolution.

use std::path::Path;

use serial_test::serial;

use ai_cli_bridge::platform::{augmented_path, execution_env, Platform};

#[test]
fn unix_path_prepends_install_dirs() {
    let home = Path::new("/home/tester");
    let path = augmented_path(Platform::Linux, "/usr/bin:/bin", home);

    let parts: Vec<&str> = path.split(':').collect();
    assert_eq!(parts[0], "/opt/homebrew/bin");
    assert_eq!(parts[1], "/usr/local/bin");
    assert_eq!(parts[2], "/home/tester/.npm-global/bin");
}

#[test]
fn original_path_is_preserved_in_full() {
    let home = Path::new("/home/tester");
    let original = "/usr/bin:/bin:/some/odd dir/bin";
    let path = augmented_path(Platform::MacOs, original, home);
    assert!(path.ends_with(original));
}

#[test]
fn windows_path_uses_semicolon_delimiter() {
    let home = Path::new("C:\\Users\\tester");
    let path = augmented_path(Platform::Windows, "C:\\Windows\\system32", home);

    assert!(path.contains("Roaming"));
    assert!(path.contains("C:\\Program Files\\nodejs;"));
    assert!(path.ends_with("C:\\Windows\\system32"));
}

#[test]
fn empty_original_path_still_yields_install_dirs() {
    let home = Path::new("/home/tester");
    let path = augmented_path(Platform::Linux, "", home);
    assert!(path.starts_with("/opt/homebrew/bin:"));
    assert!(path.ends_with(':'));
}

#[test]
#[serial]
fn execution_env_preserves_other_variables() {
    std::env::set_var("AI_CLI_BRIDGE_TEST_MARKER", "marker-value");
    let env = execution_env(Platform::current());

    assert_eq!(
        env.get("AI_CLI_BRIDGE_TEST_MARKER").map(String::as_str),
        Some("marker-value")
    );
    std::env::remove_var("AI_CLI_BRIDGE_TEST_MARKER");
}

#[test]
#[serial]
fn execution_env_path_contains_inherited_path() {
    let inherited = std::env::var("PATH").unwrap_or_default();
    let env = execution_env(Platform::current());
    let resolved = env.get("PATH").cloned().unwrap_or_default();
    assert!(resolved.contains(&inherited));
}

#[test]
#[serial]
fn shell_honors_override_variable() {
    let platform = Platform::current();
    if platform == Platform::Windows {
        return;
    }

    let saved = std::env::var("SHELL").ok();
    std::env::set_var("SHELL", "/bin/fish");
    assert_eq!(platform.shell(), "/bin/fish");

    match saved {
        Some(value) => std::env::set_var("SHELL", value),
        None => std::env::remove_var("SHELL"),
    }
}

#[test]
#[serial]
fn shell_falls_back_to_platform_default() {
    let saved = std::env::var("SHELL").ok();
    std::env::remove_var("SHELL");

    assert_eq!(Platform::MacOs.shell(), "/bin/zsh");
    assert_eq!(Platform::Linux.shell(), "/bin/bash");

    if let Some(value) = saved {
        std::env::set_var("SHELL", value);
    }
}

#[test]
fn platform_identifiers_match_presentation_conventions() {
    assert_eq!(Platform::MacOs.identifier(), "darwin");
    assert_eq!(Platform::Linux.identifier(), "linux");
    assert_eq!(Platform::Windows.identifier(), "win32");
}
