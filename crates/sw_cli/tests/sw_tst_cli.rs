// crates/sw_cli/tests/sw_tst_cli.rs
//
// Black-box runs of the `seatwatch` binary: exit codes, stdout/file output.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

const CONFIG: &str = r#"{
    "chamber_size": 5,
    "barrier_pct": 5,
    "regions": [{"id": "R1", "seats": 4}],
    "districts": [{"id": "D1", "region": "R1", "registered_voters": 140000, "previous_holder": "Y"}]
}"#;

const SNAPSHOT: &str = r#"{
    "proportional": [
        {"region": "R1", "list": "X", "votes": 100000},
        {"region": "R1", "list": "Y", "votes": "80.000"},
        {"region": "R1", "list": "Z", "votes": 30000}
    ],
    "districts": [
        {"district": "D1", "candidate": "c1", "list": "X", "votes": 52000},
        {"district": "D1", "candidate": "c2", "list": "Y", "votes": 48000}
    ],
    "completed_districts": ["D1"]
}"#;

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let p = dir.join(name);
    fs::write(&p, body).unwrap();
    p
}

fn seatwatch() -> Command {
    let mut cmd = Command::cargo_bin("seatwatch").unwrap();
    cmd.env_remove("SEATWATCH_LOG");
    cmd
}

#[test]
fn prints_canonical_outcome_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write(dir.path(), "cfg.json", CONFIG);
    let snap = write(dir.path(), "snap.json", SNAPSHOT);

    let out = seatwatch()
        .arg("--config").arg(&cfg)
        .arg("--snapshot").arg(&snap)
        .assert()
        .success()
        .stderr(predicate::str::contains("5 of 5 seats assigned"))
        .get_output()
        .stdout
        .clone();

    let v: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["regions"][0]["allocation"]["seats"]["X"], 2);
    assert_eq!(v["regions"][0]["allocation"]["seats"]["Y"], 2);
    assert_eq!(v["districts"][0]["label"], "gained");
    assert_eq!(v["national"]["total"], 5);
    assert!(v["snapshot_id"].as_str().unwrap().starts_with("SNP:"));
}

#[test]
fn writes_identical_file_on_rerun() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write(dir.path(), "cfg.json", CONFIG);
    let snap = write(dir.path(), "snap.json", SNAPSHOT);
    let out = dir.path().join("out").join("outcome.json");

    for _ in 0..2 {
        seatwatch()
            .arg("--config").arg(&cfg)
            .arg("--snapshot").arg(&snap)
            .arg("--out").arg(&out)
            .arg("--quiet")
            .assert()
            .success()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::is_empty());
    }
    let first = fs::read(&out).unwrap();
    assert!(!first.ends_with(b"\n"));
    let v: Value = serde_json::from_slice(&first).unwrap();
    assert_eq!(v["skipped_records"], 0);
}

#[test]
fn validate_only_does_not_emit_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write(dir.path(), "cfg.json", CONFIG);
    let snap = write(dir.path(), "snap.json", SNAPSHOT);

    seatwatch()
        .arg("--config").arg(&cfg)
        .arg("--snapshot").arg(&snap)
        .arg("--validate-only")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("validate-only: inputs OK"));
}

#[test]
fn seed_switches_to_lots() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write(dir.path(), "cfg.json", CONFIG);
    let snap = write(dir.path(), "snap.json", SNAPSHOT);

    let out = seatwatch()
        .arg("--config").arg(&cfg)
        .arg("--snapshot").arg(&snap)
        .arg("--seed").arg("0x2A")
        .arg("--quiet")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["tie_policy"]["kind"], "lot");
    assert_eq!(v["tie_policy"]["seed"], 42);
}

#[test]
fn bad_seed_is_a_usage_error() {
    seatwatch()
        .args(["--config", "a.json", "--snapshot", "b.json", "--seed", "0x"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write(dir.path(), "cfg.json", CONFIG);

    seatwatch()
        .arg("--config").arg(&cfg)
        .arg("--snapshot").arg(dir.path().join("absent.json"))
        .assert()
        .code(4)
        .stderr(predicate::str::contains("file not found: --snapshot"));
}

#[test]
fn url_inputs_are_rejected() {
    seatwatch()
        .args(["--config", "https://example.org/c.json", "--snapshot", "s.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no scheme"));
}

#[test]
fn malformed_json_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write(dir.path(), "cfg.json", CONFIG);
    let snap = write(dir.path(), "snap.json", "{ \"proportional\": [ oops ");

    seatwatch()
        .arg("--config").arg(&cfg)
        .arg("--snapshot").arg(&snap)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("snap.json"));
}

#[test]
fn non_numeric_vote_values_count_as_gaps() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write(dir.path(), "cfg.json", CONFIG);
    let snap = write(
        dir.path(),
        "snap.json",
        r#"{"proportional": [
            {"region": "R1", "list": "X", "votes": 100000},
            {"region": "R1", "list": "Y", "votes": true},
            {"region": "R1", "list": "Z", "votes": {"n": 1}}
        ]}"#,
    );

    let out = seatwatch()
        .arg("--config").arg(&cfg)
        .arg("--snapshot").arg(&snap)
        .arg("--quiet")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["data_gaps"], 2);
    assert_eq!(v["regions"][0]["allocation"]["seats"]["X"], 4);
    assert_eq!(v["regions"][0]["votes"]["Y"], 0);
}

#[test]
fn bad_configuration_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write(
        dir.path(),
        "cfg.json",
        r#"{"chamber_size": 1, "barrier_pct": 250, "regions": [{"id": "R1", "seats": 1}]}"#,
    );
    let snap = write(dir.path(), "snap.json", "{}");

    seatwatch()
        .arg("--config").arg(&cfg)
        .arg("--snapshot").arg(&snap)
        .arg("--validate-only")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("barrier_pct"));
}
