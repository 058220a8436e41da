//! End-to-end CLI tests running the compiled `dsf` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;

const VALID_STORE: &str = r"
name: rig
lastModified: 2026-08-30
workingDir: /opt/rig
unsignedIntegers:
  - counter: {index: 1, size: 1, min: 0, max: 255, default: 32}
buttons:
  - power: {index: 1}
";

const BROKEN_STORE: &str = r"
name: rig
lastModified: 2026-08-30
workingDir: /opt/rig
buttons:
  - fast: {index: 1, longPressTime: 10}
";

fn dsf() -> Command {
    Command::cargo_bin("dsf").unwrap()
}

fn write_store(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

fn parse_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[test]
fn validate_accepts_a_good_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_store(dir.path(), "store.yaml", VALID_STORE);

    dsf()
        .args(["validate"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("rig"));
}

#[test]
fn validate_robot_reports_object_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_store(dir.path(), "store.yaml", VALID_STORE);

    let output = dsf()
        .args(["--robot", "validate"])
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = parse_json(&output);
    assert_eq!(json["ok"], Value::Bool(true));
    assert_eq!(json["objects"], Value::from(2));
}

#[test]
fn validate_rejects_a_bad_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_store(dir.path(), "store.yaml", BROKEN_STORE);

    dsf()
        .args(["validate"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("10"));
}

#[test]
fn robot_errors_are_structured_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_store(dir.path(), "store.yaml", BROKEN_STORE);

    let output = dsf()
        .args(["--robot", "validate"])
        .arg(&path)
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();

    let json = parse_json(&output);
    assert_eq!(json["error"], Value::Bool(true));
    assert!(json["message"].is_string());
    assert!(json.get("recoverable").is_some());
}

#[test]
fn encode_then_decode_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_store(dir.path(), "store.yaml", VALID_STORE);
    let out = dir.path().join("store.cbor");

    dsf()
        .args(["encode"])
        .arg(&path)
        .args(["-o"])
        .arg(&out)
        .assert()
        .success();
    assert!(out.exists());

    let output = dsf()
        .args(["--robot", "decode"])
        .arg(&out)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = parse_json(&output);
    let objects = json["objects"].as_array().unwrap();
    assert_eq!(objects.len(), 2);
    let ids: Vec<&str> = objects
        .iter()
        .map(|o| o["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"0x0101"));
    assert!(ids.contains(&"0x0401"));
}

#[test]
fn encode_defaults_output_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_store(dir.path(), "store.yaml", VALID_STORE);

    dsf().args(["encode"]).arg(&path).assert().success();
    assert!(dir.path().join("store.cbor").exists());
}

#[test]
fn show_robot_lists_collections() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_store(dir.path(), "store.yaml", VALID_STORE);

    let output = dsf()
        .args(["--robot", "show", "-l"])
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = parse_json(&output);
    assert_eq!(json["name"], Value::from("rig"));
    assert_eq!(json["buttons"][0]["id"], Value::from("0x0401"));
    assert_eq!(json["unsignedIntegers"][0]["name"], Value::from("counter"));
}

#[test]
fn version_robot_has_version_field() {
    let output = dsf()
        .args(["--robot", "version"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = parse_json(&output);
    assert!(json["version"].is_string());
}

#[test]
fn missing_file_is_a_clean_error() {
    dsf()
        .args(["validate", "/nonexistent/store.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}
