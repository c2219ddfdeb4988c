//! Integration tests for `summon credentials`.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn summon(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("summon"));
    cmd.env("NO_COLOR", "1")
        .env("SUMMON_CONFIG", dir.path().join("config.yaml"));
    cmd
}

#[test]
fn test_maas_credential_from_presets() {
    let dir = TempDir::new().expect("temp dir");
    let output = summon(&dir)
        .args(["credentials", "maas", "--yes", "--json"])
        .args(["--set", "endpoint=maas.example.com"])
        .args(["--set", "maas-oauth=a:b:c"])
        .output()
        .expect("run");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(doc["cloud-type"], "maas");
    assert_eq!(doc["credential"]["auth-type"], "oauth1");
    assert_eq!(doc["credential"]["maas-oauth"], "a:b:c");
    assert!(
        doc["credential"].get("endpoint").is_none(),
        "endpoint is not storable"
    );
    assert!(doc["cloud"].is_null());
}

#[test]
fn test_maas_cloud_config_uses_normalized_endpoint() {
    let dir = TempDir::new().expect("temp dir");
    let output = summon(&dir)
        .args(["credentials", "maas", "--yes", "--json", "--cloud-config"])
        .args(["--set", "endpoint=10.0.0.2"])
        .args(["--set", "maas-oauth=a:b:c"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(doc["cloud"]["type"], "maas");
    assert_eq!(doc["cloud"]["endpoint"], "http://10.0.0.2:5240/MAAS");
}

#[test]
fn test_credential_yaml_output() {
    let dir = TempDir::new().expect("temp dir");
    summon(&dir)
        .args(["credentials", "ec2", "--yes"])
        .args(["--set", "access-key=AKIA", "--set", "secret-key=s3cr3t"])
        .assert()
        .success()
        .stdout(predicate::str::contains("auth-type: access-key"))
        .stdout(predicate::str::contains("access-key: AKIA"));
}

#[test]
fn test_invalid_api_key_fails() {
    let dir = TempDir::new().expect("temp dir");
    summon(&dir)
        .args(["credentials", "maas", "--yes"])
        .args(["--set", "endpoint=maas.example.com"])
        .args(["--set", "maas-oauth=only-one-token"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Credential for maas is not valid"));
}

#[test]
fn test_missing_required_field_fails() {
    let dir = TempDir::new().expect("temp dir");
    summon(&dir)
        .args(["credentials", "ec2", "--yes", "--set", "access-key=AKIA"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Credential for ec2 is not valid"));
}

#[test]
fn test_unknown_cloud_type_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    summon(&dir)
        .args(["credentials", "nimbus", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nimbus"));
}

#[test]
fn test_unknown_field_lists_valid_fields() {
    let dir = TempDir::new().expect("temp dir");
    summon(&dir)
        .args(["credentials", "ec2", "--yes", "--set", "token=x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown field 'token'"))
        .stderr(predicate::str::contains("access-key, secret-key"));
}

#[test]
fn test_malformed_preset_is_usage_error() {
    let dir = TempDir::new().expect("temp dir");
    summon(&dir)
        .args(["credentials", "ec2", "--yes", "--set", "novalue"])
        .assert()
        .code(2);
}
