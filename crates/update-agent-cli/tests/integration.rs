#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const LISTING: &str =
    "printf 'Inst libfoo [1.0 => 1.1] (security)\\nInst libbar [2.0 => 2.1]\\n'";

fn agent(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("update-agent").unwrap();
    cmd.current_dir(dir.path())
        .env("UPDATE_STATUS_FILE", status_path(dir))
        .env("TRIGGER_FILE", trigger_path(dir))
        .env("HOST_ROOT", dir.path().join("host"))
        .env("UPGRADE_COMMAND", LISTING)
        .env_remove("CHECK_INTERVAL_SECONDS")
        .env_remove("COMMAND_TIMEOUT_SECONDS")
        .env_remove("RUST_LOG");
    cmd
}

fn status_path(dir: &TempDir) -> PathBuf {
    dir.path().join("data/update-status.json")
}

fn trigger_path(dir: &TempDir) -> PathBuf {
    dir.path().join("data/trigger-refresh")
}

fn host_file(dir: &TempDir, rel: &str, content: &str) {
    let path = dir.path().join("host").join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// update-agent check
// ---------------------------------------------------------------------------

#[test]
fn check_writes_status_record() {
    let dir = TempDir::new().unwrap();
    host_file(&dir, "var/run/reboot-required", "");
    host_file(
        &dir,
        "var/run/reboot-required.pkgs",
        "linux-image-generic\n\nlibssl3\n",
    );
    host_file(&dir, "var/lib/apt/periodic/update-success-stamp", "");

    agent(&dir)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Status updated: 2 updates available"));

    let json = read_json(&status_path(&dir));
    assert_eq!(json["upgrades"]["total"], 2);
    assert_eq!(json["upgrades"]["security"], 1);
    assert_eq!(
        json["upgrades"]["allPackages"],
        serde_json::json!(["libfoo", "libbar"])
    );
    assert_eq!(
        json["upgrades"]["securityPackages"],
        serde_json::json!(["libfoo"])
    );
    assert_eq!(json["reboot"]["required"], true);
    assert_eq!(
        json["reboot"]["packages"],
        serde_json::json!(["linux-image-generic", "libssl3"])
    );
    assert!(json["lastUpdateCheck"].is_string());
    assert!(json["agentTimestamp"].is_string());
}

#[test]
fn check_on_bare_host_publishes_defaults() {
    let dir = TempDir::new().unwrap();
    agent(&dir)
        .args(["check", "--upgrade-command", "exit 100"])
        .assert()
        .success();

    let json = read_json(&status_path(&dir));
    assert_eq!(json["upgrades"]["total"], 0);
    assert_eq!(json["upgrades"]["allPackages"], serde_json::json!([]));
    assert_eq!(json["reboot"]["required"], false);
    assert!(json["lastUpdateCheck"].is_null());
}

#[test]
fn check_fails_when_status_cannot_be_written() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("data"), "not a directory").unwrap();

    agent(&dir)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("update check failed"));
}

#[test]
fn zero_check_interval_is_rejected() {
    let dir = TempDir::new().unwrap();
    agent(&dir)
        .env("CHECK_INTERVAL_SECONDS", "0")
        .arg("check")
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// update-agent trigger / status
// ---------------------------------------------------------------------------

#[test]
fn trigger_creates_marker() {
    let dir = TempDir::new().unwrap();
    agent(&dir)
        .arg("trigger")
        .assert()
        .success()
        .stdout(predicate::str::contains("Refresh triggered"));

    assert!(trigger_path(&dir).is_file());
}

#[test]
fn status_without_record_fails() {
    let dir = TempDir::new().unwrap();
    agent(&dir)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no status published yet"));
}

#[test]
fn status_summarizes_published_record() {
    let dir = TempDir::new().unwrap();
    agent(&dir).arg("check").assert().success();

    agent(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 available (1 security)"))
        .stdout(predicate::str::contains("libfoo, libbar"))
        .stdout(predicate::str::contains("not required"));
}

#[test]
fn status_json_prints_record() {
    let dir = TempDir::new().unwrap();
    agent(&dir).arg("check").assert().success();

    let out = agent(&dir).args(["status", "--json"]).output().unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["upgrades"]["total"], 2);
}

// ---------------------------------------------------------------------------
// update-agent run
// ---------------------------------------------------------------------------

#[test]
fn run_checks_on_startup_and_consumes_trigger() {
    let dir = TempDir::new().unwrap();
    let bin = assert_cmd::cargo::cargo_bin("update-agent");
    let mut child = std::process::Command::new(bin)
        .current_dir(dir.path())
        .env("UPDATE_STATUS_FILE", status_path(&dir))
        .env("TRIGGER_FILE", trigger_path(&dir))
        .env("HOST_ROOT", dir.path().join("host"))
        .env("UPGRADE_COMMAND", LISTING)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .unwrap();

    let wait_for = |cond: &dyn Fn() -> bool| {
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(15);
        while std::time::Instant::now() < deadline {
            if cond() {
                return true;
            }
            std::thread::sleep(std::time::Duration::from_millis(100));
        }
        false
    };

    let started = wait_for(&|| status_path(&dir).exists());
    let first = std::fs::read_to_string(status_path(&dir)).unwrap_or_default();

    std::fs::write(trigger_path(&dir), "").unwrap();
    let consumed = wait_for(&|| !trigger_path(&dir).exists());
    let rewritten = wait_for(&|| {
        std::fs::read_to_string(status_path(&dir)).unwrap_or_default() != first
    });

    child.kill().unwrap();
    let _ = child.wait();

    assert!(started, "initial check never published a status");
    assert!(consumed, "trigger file was not consumed");
    assert!(rewritten, "triggered check did not republish the status");
}
