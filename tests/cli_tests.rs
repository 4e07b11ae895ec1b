//! CLI Integration Tests for Agent Hub
//!
//! Runs the built binary for the commands that need no network: help,
//! init, config and a mock-agent run.

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run agent-hub with arguments, optionally inside `working_dir`
fn run_hub(args: &[&str], working_dir: Option<&std::path::Path>) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_agent-hub"));
    cmd.args(args).env("RUST_LOG", "off");

    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    cmd.output().expect("Failed to execute agent-hub")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_lists_subcommands() {
    let output = run_hub(&["--help"], None);

    assert!(output.status.success());
    let text = stdout(&output);
    for command in ["serve", "run", "simulate", "init", "config"] {
        assert!(text.contains(command), "missing {}", command);
    }
}

#[test]
fn test_version() {
    let output = run_hub(&["--version"], None);

    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

// =============================================================================
// Init Command Tests
// =============================================================================

#[test]
fn test_init_writes_config() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_hub(&["--no-color", "init", "."], Some(temp_dir.path()));

    assert!(output.status.success(), "{}", stdout(&output));
    let toml = fs::read_to_string(temp_dir.path().join("hub.toml")).unwrap();
    assert!(toml.contains("[server]"));
    assert!(toml.contains("agent-gpt"));
    let env = fs::read_to_string(temp_dir.path().join(".env.example")).unwrap();
    assert!(env.contains("HUB_ADMIN_PASSWORD="));
}

#[test]
fn test_init_keeps_existing_config() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("hub.toml"), "# mine\n").unwrap();

    let output = run_hub(&["--no-color", "init", "."], Some(temp_dir.path()));

    assert!(output.status.success());
    assert!(stdout(&output).contains("already exists"));
    let toml = fs::read_to_string(temp_dir.path().join("hub.toml")).unwrap();
    assert_eq!(toml, "# mine\n");
}

// =============================================================================
// Config Command Tests
// =============================================================================

#[test]
fn test_config_validate_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_hub(&["--no-color", "config", "--validate"], Some(temp_dir.path()));

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("agent-claude"));
    assert!(text.contains("Configuration is valid"));
}

#[test]
fn test_config_rejects_duplicate_agents() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("hub.toml"),
        r#"
[providers.openai]
type = "openai"
api_key_env = "OPENAI_API_KEY"

[[agents]]
id = "twin"
name = "One"
provider = "openai"
model = "gpt-4o"

[[agents]]
id = "twin"
name = "Two"
provider = "openai"
model = "gpt-4o"
"#,
    )
    .unwrap();

    let output = run_hub(&["--no-color", "config", "--validate"], Some(temp_dir.path()));

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("twin"));
}

// =============================================================================
// Run Command Tests
// =============================================================================

#[test]
fn test_mock_run_prints_context_json() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_hub(
        &["--no-color", "run", "Is fusion power viable?", "--mock"],
        Some(temp_dir.path()),
    );

    assert!(output.status.success());
    let context: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(context["question_text"], "Is fusion power viable?");
    assert_eq!(context["conclusions"].as_object().unwrap().len(), 3);
}

#[test]
fn test_mock_run_writes_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_hub(
        &["--no-color", "run", "Why is the sky blue?", "--mock", "-o", "ctx.json"],
        Some(temp_dir.path()),
    );

    assert!(output.status.success());
    let written = fs::read_to_string(temp_dir.path().join("ctx.json")).unwrap();
    let context: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(context["research"].as_object().unwrap().len(), 3);
}
