//! Integration tests for the `levante` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! project resolution, and the reconciliation error paths that fail before
//! any external command would run -- all without the `ios` or `cordova`
//! tools installed.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `levante` binary with env isolation.
///
/// Clears all `LEVANTE_*` env vars and points HOME at a nonexistent path
/// so tests never touch the user's real environment.
fn levante_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("levante");
    cmd.env("HOME", "/tmp/levante-cli-test-nonexistent")
        .env_remove("LEVANTE_PROJECT_DIR")
        .env_remove("LEVANTE_OUTPUT")
        .env_remove("LEVANTE_APPLE_PASSWORD")
        .env_remove("NO_COLOR");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Synthetic `.mobileprovision` bytes: an XML plist wrapped in the kind of
/// binary garbage the CMS envelope contributes.
fn profile_bytes(name: &str, uuids: &[&str]) -> Vec<u8> {
    let entries: String = uuids
        .iter()
        .map(|uuid| format!("        <string>{uuid}</string>\n"))
        .collect();
    let plist = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
    <key>Name</key>
    <string>{name}</string>
    <key>ProvisionedDevices</key>
    <array>
{entries}    </array>
    <key>Entitlements</key>
    <dict>
        <key>get-task-allow</key>
        <true/>
    </dict>
</dict>
</plist>"#
    );
    let mut bytes = vec![0x30, 0x82, 0x01, 0xff];
    bytes.extend_from_slice(plist.as_bytes());
    bytes.extend_from_slice(&[0x00, 0x31, 0x82]);
    bytes
}

/// Lay out a complete demo project in a temp dir: `levante.json` plus a
/// synthetic provisioning profile for the `release` configuration.
fn demo_project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("profiles")).unwrap();
    std::fs::write(
        dir.path().join("profiles/release.mobileprovision"),
        profile_bytes("Demo Release", &["1111aaaa", "2222bbbb"]),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("levante.json"),
        r#"{
            "name": "demo-app",
            "platforms": ["android"],
            "deploy": {
                "apple_id": "dev@example.org",
                "apple_developer_team": "ABCDEF1234"
            },
            "configurations": {
                "ios": {
                    "release": {
                        "provisioning_profile_name": "Demo Release",
                        "provisioning_profile_path": "profiles/release.mobileprovision"
                    },
                    "beta": {
                        "provisioning_profile_path": "profiles/beta.mobileprovision"
                    }
                }
            }
        }"#,
    )
    .unwrap();
    dir
}

fn in_project(dir: &Path) -> assert_cmd::Command {
    let mut cmd = levante_cmd();
    cmd.current_dir(dir);
    cmd
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = levante_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    levante_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("provisioning")
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("platforms"))
            .and(predicate::str::contains("info")),
    );
}

#[test]
fn test_version_flag() {
    levante_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("levante"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    levante_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    levante_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = levante_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_devices_list_outside_a_project() {
    let dir = tempfile::tempdir().unwrap();
    let output = in_project(dir.path())
        .args(["devices", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "usage exit code expected");
    let text = combined_output(&output);
    assert!(text.contains("levante.json"), "{text}");
}

#[test]
fn test_attach_requires_both_positionals() {
    levante_cmd()
        .args(["devices", "attach", "1111aaaa"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CONFIGURATION").or(predicate::str::contains("required")));
}

#[test]
fn test_invalid_output_format() {
    let output = levante_cmd()
        .args(["--output", "invalid", "devices", "list"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

// ── Profile inspection (no portal involved) ─────────────────────────

#[test]
fn test_list_configuration_reports_profile_devices() {
    let dir = demo_project();
    in_project(dir.path())
        .args(["devices", "list", "release"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Demo Release")
                .and(predicate::str::contains("development"))
                .and(predicate::str::contains("1111aaaa"))
                .and(predicate::str::contains("2222bbbb")),
        );
}

#[test]
fn test_list_configuration_json_output() {
    let dir = demo_project();
    let output = in_project(dir.path())
        .args(["--output", "json", "devices", "list", "release"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["name"], "Demo Release");
    assert_eq!(parsed["devices"].as_array().unwrap().len(), 2);
    assert!(parsed["devices"][0]["name"].is_null());
}

#[test]
fn test_list_unknown_configuration_is_not_found() {
    let dir = demo_project();
    let output = in_project(dir.path())
        .args(["devices", "list", "nightly"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4), "not-found exit code");
    let text = combined_output(&output);
    assert!(text.contains("nightly"), "{text}");
}

#[test]
fn test_list_incomplete_configuration_names_the_missing_field() {
    let dir = demo_project();
    let output = in_project(dir.path())
        .args(["devices", "list", "beta"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "usage exit code");
    let text = combined_output(&output);
    assert!(text.contains("provisioning_profile_name"), "{text}");
}

// ── Reconciliation error paths that precede any gateway call ────────

#[test]
fn test_attach_incomplete_configuration_fails_before_portal() {
    let dir = demo_project();
    let output = in_project(dir.path())
        .env("LEVANTE_APPLE_PASSWORD", "hunter2")
        .args(["devices", "attach", "1111aaaa", "beta"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "usage exit code");
    let text = combined_output(&output);
    assert!(text.contains("provisioning_profile_name"), "{text}");
}

#[test]
fn test_detach_device_not_in_profile() {
    let dir = demo_project();
    let output = in_project(dir.path())
        .env("LEVANTE_APPLE_PASSWORD", "hunter2")
        .args(["devices", "detach", "9999zzzz", "release"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4), "not-found exit code");
    let text = combined_output(&output);
    assert!(text.contains("not included"), "{text}");
}

// ── Info & platforms ────────────────────────────────────────────────

#[test]
fn test_info_shows_project_summary() {
    let dir = demo_project();
    in_project(dir.path()).arg("info").assert().success().stdout(
        predicate::str::contains("demo-app")
            .and(predicate::str::contains("release"))
            .and(predicate::str::contains("Demo Release")),
    );
}

#[test]
fn test_platforms_list_without_app_dir_is_empty() {
    let dir = demo_project();
    in_project(dir.path())
        .args(["platforms", "list"])
        .assert()
        .success();
}

#[test]
fn test_platforms_list_shows_installed_dirs() {
    let dir = demo_project();
    std::fs::create_dir_all(dir.path().join("app/platforms/android")).unwrap();
    in_project(dir.path())
        .args(["platforms", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("android"));
}

#[cfg(unix)]
#[test]
fn test_platforms_add_records_the_platform() {
    use std::os::unix::fs::PermissionsExt;

    let dir = demo_project();
    std::fs::create_dir_all(dir.path().join("app")).unwrap();

    // Fake cordova on PATH.
    let bin = tempfile::tempdir().unwrap();
    let fake = bin.path().join("cordova");
    std::fs::write(&fake, "#!/bin/sh\nexit 0\n").unwrap();
    std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();
    let path = format!(
        "{}:{}",
        bin.path().display(),
        std::env::var("PATH").unwrap_or_default()
    );

    in_project(dir.path())
        .env("PATH", path)
        .args(["platforms", "add", "browser"])
        .assert()
        .success()
        .stdout(predicate::str::contains("browser"));

    let settings = std::fs::read_to_string(dir.path().join("levante.json")).unwrap();
    assert!(settings.contains("browser"), "{settings}");
}

#[test]
fn test_platforms_add_unknown_platform() {
    let dir = demo_project();
    let output = in_project(dir.path())
        .args(["platforms", "add", "webos"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("webos"), "{text}");
}
