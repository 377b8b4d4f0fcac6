#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the storaged binary
//!
//! These tests verify help/version output, configuration validation and that
//! a failed bootstrap surfaces as a non-zero exit instead of a running daemon.

use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Helper to run the storaged binary with given arguments
fn run_storaged(args: &[&str], home: &Path) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_storaged"))
        .args(args)
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute storaged")
}

fn write_config(dir: &TempDir, body: &str) -> String {
    let path = dir.path().join("storaged.yaml");
    std::fs::write(&path, body).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_cli_help_command() {
    let home = TempDir::new().unwrap();
    let output = run_storaged(&["--help"], home.path());

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("storaged"), "Should contain binary name");
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
}

#[test]
fn test_cli_version_command() {
    let home = TempDir::new().unwrap();
    let output = run_storaged(&["--version"], home.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("storaged"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_check_valid_config() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state");
    let config = write_config(
        &dir,
        &format!("node:\n  local_state_dir: {}\n", state.display()),
    );

    let output = run_storaged(&["--config", &config, "check"], dir.path());

    assert!(
        output.status.success(),
        "check should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration is valid"));
    assert!(!state.exists(), "check must not create the state directory");
}

#[test]
fn test_check_rejects_relative_state_dir() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "node:\n  local_state_dir: relative/dir\n");

    let output = run_storaged(&["--config", &config, "check"], dir.path());

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("local state directory"), "stderr: {stderr}");
}

#[test]
fn test_missing_config_file_fails() {
    let home = TempDir::new().unwrap();
    let output = run_storaged(&["--config", "/no/such/storaged.yaml", "check"], home.path());

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config file does not exist"));
}

#[test]
fn test_print_config_is_yaml() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "coordination:\n  port: 3379\n");

    let output = run_storaged(&["--config", &config, "--print-config"], dir.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_saphyr::from_str(&stdout).unwrap();
    assert_eq!(parsed["coordination"]["port"], 3379);
    assert_eq!(parsed["node"]["local_state_dir"], "~/.storaged");
}

#[test]
fn test_run_exits_when_coordination_store_is_unreachable() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state");
    // Nothing listens on port 9, so the connect probe fails
    let config = write_config(
        &dir,
        &format!(
            "node:\n  local_state_dir: {}\n  advertise_address: 127.0.0.1\ncoordination:\n  port: 9\nadmin:\n  listen_addr: 127.0.0.1:0\n",
            state.display()
        ),
    );

    let output = run_storaged(&["--config", &config, "run"], dir.path());

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("coordination client unavailable"),
        "stderr: {stderr}"
    );
    // Identity was still resolved and persisted before the failure
    assert!(state.join("node.id").is_file());
}
