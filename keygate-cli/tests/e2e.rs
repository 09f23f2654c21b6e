//! End-to-end tests that run the built `keygate` binary.
//!
//! Gated behind the `integration` feature flag. Run with:
//!
//! ```sh
//! cargo test -p keygate-cli --features integration
//! ```
//!
//! `integration_live` additionally checks a real key from
//! `ANTHROPIC_API_KEY` against the API.

#![cfg(feature = "integration")]

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Run keygate in `dir` with no ambient key and an isolated project config.
fn keygate(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_keygate"))
        .args(args)
        .current_dir(dir)
        .env_remove("ANTHROPIC_API_KEY")
        .env("KEYGATE_PROJECT_CONFIG_DIR", dir.join(".keygate"))
        .output()
        .expect("Failed to run keygate")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn keygate_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    let output = keygate(dir.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("Set up and check your Anthropic API key"));
    for command in ["login", "set-key", "status", "verify", "ask", "chat", "console", "config"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[test]
fn keygate_config_show_prints_defaults() {
    let dir = TempDir::new().unwrap();
    let output = keygate(dir.path(), &["config", "show"]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("[credentials]"));
    assert!(stdout.contains("[client]"));
    assert!(stdout.contains("max_tokens = 1024"));
}

#[test]
fn keygate_config_path_shows_credentials_file() {
    let dir = TempDir::new().unwrap();
    let env_file = dir.path().join("custom.env");
    let output = keygate(
        dir.path(),
        &["config", "path", "--env-file", env_file.to_str().unwrap()],
    );

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("Project config:"));
    assert!(stdout.contains("custom.env"));
}

#[test]
fn keygate_status_without_key() {
    let dir = TempDir::new().unwrap();
    let output = keygate(dir.path(), &["status"]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("(not configured)"));
    assert!(stdout.contains("No API key found"));
}

#[test]
fn keygate_set_key_then_status_reads_file() {
    let dir = TempDir::new().unwrap();
    let env_file = dir.path().join(".env");
    std::fs::write(&env_file, "OTHER_SETTING=keep-me\n").unwrap();
    let key = "sk-ant-REDACTED";

    let output = keygate(dir.path(), &["set-key", key, "--mode", "file"]);
    assert!(output.status.success());

    let contents = std::fs::read_to_string(&env_file).unwrap();
    assert!(contents.contains(&format!("ANTHROPIC_API_KEY={key}")));
    assert!(contents.contains("OTHER_SETTING=keep-me"));

    let output = keygate(dir.path(), &["status"]);
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("sk-ant-e2e..."));
    assert!(!stdout.contains(key), "status must not print the full key");
}

#[test]
fn keygate_verify_without_key_fails() {
    let dir = TempDir::new().unwrap();
    let output = keygate(dir.path(), &["verify"]);

    assert!(!output.status.success());
    assert!(stdout(&output).contains("No API key configured"));
}

#[test]
fn keygate_verify_reports_source_offline() {
    let dir = TempDir::new().unwrap();
    let output = keygate(
        dir.path(),
        &["verify", "--api-key", "sk-ant-offline-0123456789"],
    );

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("sk-ant-off..."));
    assert!(stdout.contains("explicit"));
}

#[test]
fn keygate_rejects_unknown_mode() {
    let dir = TempDir::new().unwrap();
    let output = keygate(dir.path(), &["set-key", "sk-ant-x", "--mode", "keyring"]);

    assert!(!output.status.success());
    assert!(!dir.path().join(".env").exists());
}

#[cfg(feature = "integration_live")]
#[test]
fn keygate_verify_live_with_real_key() {
    let Ok(key) = std::env::var("ANTHROPIC_API_KEY") else {
        eprintln!("ANTHROPIC_API_KEY not set, skipping");
        return;
    };
    let dir = TempDir::new().unwrap();
    let output = keygate(dir.path(), &["verify", "--live", "--api-key", &key]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("API key accepted"));
}
