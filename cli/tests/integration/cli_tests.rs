//! Integration tests for the CLI surface: help, providers, status and actions.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Config pointing the backend at a binary that is never on `PATH`.
const MISSING_BACKEND: &str = "backend:\n  binary: summon-test-no-such-backend\n";

fn summon(dir: &TempDir) -> Command {
    let config = dir.path().join("config.yaml");
    std::fs::write(&config, MISSING_BACKEND).expect("write config");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("summon"));
    cmd.env("NO_COLOR", "1")
        .env("SUMMON_CONFIG", &config)
        .env_remove("SUMMON_MODEL")
        .env_remove("SUMMON_SPELLS_DIR");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help() {
    let dir = TempDir::new().expect("temp dir");
    summon(&dir).assert().code(2).stderr(predicate::str::contains(
        "Provision a controller and model",
    ));
}

#[test]
fn test_cli_help_lists_commands() {
    let dir = TempDir::new().expect("temp dir");
    summon(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("credentials"))
        .stdout(predicate::str::contains("run-action"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    let dir = TempDir::new().expect("temp dir");
    summon(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("summon"));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    let dir = TempDir::new().expect("temp dir");
    summon(&dir).arg("conjure").assert().code(2);
}

// --- providers ---

#[test]
fn test_providers_lists_cloud_types() {
    let dir = TempDir::new().expect("temp dir");
    summon(&dir)
        .arg("providers")
        .assert()
        .success()
        .stdout(predicate::str::contains("ec2"))
        .stdout(predicate::str::contains("maas"))
        .stdout(predicate::str::contains("vsphere"))
        .stdout(predicate::str::contains("oauth1"));
}

#[test]
fn test_providers_json_is_valid() {
    let dir = TempDir::new().expect("temp dir");
    let output = summon(&dir)
        .args(["providers", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let list: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let maas = list
        .as_array()
        .expect("array")
        .iter()
        .find(|p| p["cloud-type"] == "maas")
        .expect("maas listed");
    assert_eq!(maas["auth-type"], "oauth1");
    assert_eq!(maas["fields"], serde_json::json!(["endpoint", "maas-oauth"]));

    let lxd = list
        .as_array()
        .expect("array")
        .iter()
        .find(|p| p["cloud-type"] == "lxd")
        .expect("lxd listed");
    assert!(lxd["auth-type"].is_null());
}

// --- status / leader / run-action against an unreachable backend ---

#[test]
fn test_status_requires_model() {
    let dir = TempDir::new().expect("temp dir");
    summon(&dir).arg("status").assert().code(2);
}

#[test]
fn test_status_unavailable_backend_fails() {
    let dir = TempDir::new().expect("temp dir");
    summon(&dir)
        .args(["status", "-m", "ctl:conjure"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unable to read status of ctl:conjure"));
}

#[test]
fn test_status_unavailable_backend_json_error() {
    let dir = TempDir::new().expect("temp dir");
    summon(&dir)
        .args(["status", "--json"])
        .env("SUMMON_MODEL", "ctl:conjure")
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""code": "STATUS_UNAVAILABLE""#));
}

#[test]
fn test_leader_without_backend_fails() {
    let dir = TempDir::new().expect("temp dir");
    summon(&dir)
        .args(["leader", "mysql", "-m", "ctl:conjure", "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""leader": null"#));
}

#[test]
fn test_run_action_without_backend_reports_backend_error() {
    let dir = TempDir::new().expect("temp dir");
    summon(&dir)
        .args(["run-action", "mysql/0", "backup", "-m", "ctl:conjure", "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""code": "BACKEND_ERROR""#));
}

// --- deploy ---

#[test]
fn test_deploy_unknown_cloud_type_fails_before_backend() {
    let dir = TempDir::new().expect("temp dir");
    let spell = dir.path().join("spell");
    std::fs::create_dir_all(spell.join("steps")).expect("spell dir");

    summon(&dir)
        .args(["deploy", "--yes", "--cloud", "nimbus", "--cloud-type", "nimbus"])
        .args(["--controller", "ctl", "--model", "conjure"])
        .arg(&spell)
        .assert()
        .failure()
        .stderr(predicate::str::contains("nimbus"));
}

#[test]
fn test_deploy_without_backend_fails() {
    let dir = TempDir::new().expect("temp dir");
    let spell = dir.path().join("spell");
    std::fs::create_dir_all(spell.join("steps")).expect("spell dir");

    summon(&dir)
        .args(["deploy", "--yes", "--cloud", "localhost", "--cloud-type", "lxd"])
        .args(["--controller", "ctl", "--model", "conjure"])
        .arg(&spell)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_deploy_rejects_invalid_step_file() {
    let dir = TempDir::new().expect("temp dir");
    let spell = dir.path().join("spell");
    std::fs::create_dir_all(spell.join("steps")).expect("spell dir");
    std::fs::write(spell.join("steps").join("00_broken.yaml"), "viewable: [").expect("write");

    summon(&dir)
        .args(["deploy", "--yes", "--cloud", "localhost", "--cloud-type", "lxd"])
        .args(["--controller", "ctl", "--model", "conjure"])
        .arg(&spell)
        .assert()
        .failure()
        .stderr(predicate::str::contains("00_broken.yaml"));
}
