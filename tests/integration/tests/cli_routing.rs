//! CLI binary integration tests.
//!
//! These tests exercise the compiled `secretagent` binary against a
//! temporary vault to verify command routing, output and exit codes.

use secretagent_core::config::GenerationProvider;
use secretagent_integration_tests::{secretagent_bin, stderr, stdout, TestVault};
use std::process::Command;

#[test]
fn test_cli_version() {
    let output = Command::new(secretagent_bin())
        .arg("version")
        .output()
        .expect("failed to run secretagent");
    assert!(output.status.success(), "version command should succeed");
    assert!(
        stdout(&output).contains("secretagent"),
        "version output should contain 'secretagent', got: {}",
        stdout(&output)
    );
}

#[test]
fn test_cli_help() {
    let output = Command::new(secretagent_bin())
        .arg("--help")
        .output()
        .expect("failed to run secretagent");
    assert!(output.status.success(), "--help should succeed");
    let out = stdout(&output);
    for command in ["list", "add", "show", "delete", "config"] {
        assert!(out.contains(command), "help should mention '{command}', got: {out}");
    }
}

#[test]
fn test_cli_unknown_command() {
    let output = Command::new(secretagent_bin())
        .arg("nonexistent-command")
        .output()
        .expect("failed to run secretagent");
    assert!(
        !output.status.success(),
        "unknown command should return non-zero exit code"
    );
}

#[test]
fn test_list_empty_vault() {
    let vault = TestVault::new();
    let output = vault.run(&["list"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("No secrets stored."));
}

#[test]
fn test_add_list_show_delete() {
    let vault = TestVault::new();

    let output = vault.run(&[
        "add", "password", "--name", "Email", "--length", "12", "--no-symbols", "--yes",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Saved 'Email'"));

    let output = vault.run(&["list", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let listed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let entries = listed.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "Email");
    assert_eq!(entries[0]["type"], "password");
    assert!(entries[0].get("value").is_none());
    let id = entries[0]["id"].as_str().unwrap().to_string();

    let output = vault.run(&["list", "mail"]);
    assert!(stdout(&output).contains("Email"));
    assert!(stdout(&output).contains("1 secret(s) total."));

    let output = vault.run(&["list", "bank"]);
    assert!(stdout(&output).contains("No secrets match 'bank'."));

    // Value stays masked unless revealed
    let output = vault.run(&["show", &id[..8]]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Length:"));

    let output = vault.run(&["show", &id, "--reveal"]);
    let revealed = stdout(&output);
    let value_line = revealed
        .lines()
        .find(|line| line.contains("Value:"))
        .expect("value line");
    let value = value_line.split_whitespace().last().unwrap();
    assert_eq!(value.chars().count(), 12);
    assert!(value.chars().all(|c| c.is_ascii_alphanumeric()));

    let output = vault.run(&["delete", &id, "--yes"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Secret 'Email' deleted."));

    let output = vault.run(&["list"]);
    assert!(stdout(&output).contains("No secrets stored."));
}

#[test]
fn test_add_api_key_prints_comments() {
    let vault = TestVault::new();
    let output = vault.run(&[
        "add",
        "api-key",
        "--name",
        "CI token",
        "--service",
        "GitHub automation",
        "--access",
        "read-only",
        "--yes",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("sk_readonly_"));
    assert!(out.contains("GitHub automation"));
}

#[test]
fn test_list_search_matches_service_description() {
    let vault = TestVault::new();
    let output = vault.run(&[
        "add", "api-key", "--name", "CI token", "--service", "GitHub automation", "--access",
        "read-only", "--yes",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = vault.run(&["list", "GITHUB"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("CI token"));
    assert!(stdout(&output).contains("1 secret(s) total."));

    let output = Command::new(secretagent_bin())
        .args(["list", "--help"])
        .output()
        .expect("failed to run secretagent");
    assert!(stdout(&output).contains("service description"));
}

#[test]
fn test_add_invalid_length_fails() {
    let vault = TestVault::new();
    let output = vault.run(&["add", "password", "--name", "Email", "--length", "4", "--yes"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("length"));

    let output = vault.run(&["list"]);
    assert!(stdout(&output).contains("No secrets stored."));
}

#[test]
fn test_add_without_credentials_fails() {
    let vault = TestVault::with_config(|builder| {
        builder
            .provider(GenerationProvider::OpenAI)
            .api_key_env("SECRETAGENT_IT_MISSING_KEY")
    });
    let output = vault
        .command()
        .env_remove("SECRETAGENT_IT_MISSING_KEY")
        .args(["add", "password", "--name", "Email", "--yes"])
        .output()
        .expect("failed to run secretagent");

    assert!(!output.status.success());
    assert!(stderr(&output).contains("SECRETAGENT_IT_MISSING_KEY"));
}

#[test]
fn test_show_unknown_id_fails() {
    let vault = TestVault::new();
    let output = vault.run(&["show", "does-not-exist"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("No secret with ID"));
}

#[test]
fn test_config_path_and_show() {
    let vault = TestVault::new();

    let output = vault.run(&["config", "path"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        vault.config_path.display().to_string()
    );

    let output = vault.run(&["config", "show"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("\"provider\": \"local\""));
}

#[test]
fn test_config_init_respects_force() {
    let vault = TestVault::new();

    let output = vault.run(&["config", "init"]);
    assert!(!output.status.success(), "existing config must not be overwritten");
    assert!(stderr(&output).contains("--force"));

    let output = vault.run(&["config", "init", "--force"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn test_invalid_config_is_reported() {
    let vault = TestVault::new();
    std::fs::write(&vault.config_path, "{ storage: { key: '../escape' } }").unwrap();

    let output = vault.run(&["list"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid storage key"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_copy_without_display() {
    let vault = TestVault::new();

    // A failed copy on add is only a warning; the secret is still saved.
    let output = vault
        .command()
        .env_remove("DISPLAY")
        .env_remove("WAYLAND_DISPLAY")
        .args(["add", "password", "--name", "Email", "--copy", "--yes"])
        .output()
        .expect("failed to run secretagent");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Saved 'Email'"));
    assert!(stderr(&output).contains("Could not copy to clipboard"));

    let output = vault.run(&["list", "--json"]);
    let listed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let id = listed[0]["id"].as_str().unwrap().to_string();

    // On show the copy was the whole point, so failing to copy is an error.
    let output = vault
        .command()
        .env_remove("DISPLAY")
        .env_remove("WAYLAND_DISPLAY")
        .args(["show", &id, "--copy"])
        .output()
        .expect("failed to run secretagent");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Clipboard is not available"));
}
