//! Binary-level tests for the notecue CLI

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::helpers::fixtures_dir;

/// notecue with its config directory pointed at `config_dir`.
fn notecue(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("notecue").unwrap();
    cmd.env("NOTECUE_CONFIG_DIR", config_dir)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn copy_fixture(dir: &TempDir, name: &str) -> std::path::PathBuf {
    let dest = dir.path().join(name);
    fs::copy(fixtures_dir().join(name), &dest).unwrap();
    dest
}

// ============================================================================
// parse
// ============================================================================

#[test]
fn parse_prints_table() {
    let config = TempDir::new().unwrap();
    notecue(config.path())
        .arg("parse")
        .arg(fixtures_dir().join("lecture.md"))
        .assert()
        .success()
        .stdout(predicate::str::contains("3 directive(s)"))
        .stdout(predicate::str::contains("00:00:45"))
        .stdout(predicate::str::contains("|2"));
}

#[test]
fn parse_json_is_machine_readable() {
    let config = TempDir::new().unwrap();
    let output = notecue(config.path())
        .args(["parse", "--json"])
        .arg(fixtures_dir().join("chained.md"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list[0]["action"]["kind"], "auto-jump");
    assert_eq!(list[2]["start"], 150.0);
}

#[test]
fn parse_missing_file_fails() {
    let config = TempDir::new().unwrap();
    notecue(config.path())
        .args(["parse", "does-not-exist.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

// ============================================================================
// stamp
// ============================================================================

#[test]
fn stamp_prints_updated_note_without_touching_file() {
    let work = TempDir::new().unwrap();
    let note = copy_fixture(&work, "lecture.md");
    let before = fs::read_to_string(&note).unwrap();

    notecue(work.path())
        .arg("stamp")
        .arg(&note)
        .args(["--at", "1:00", "--duration", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[00:01:00-00:01:05, 100%, 1.00x]"));

    assert_eq!(fs::read_to_string(&note).unwrap(), before);
}

#[test]
fn stamp_write_chains_previous_directive() {
    let work = TempDir::new().unwrap();
    let note = copy_fixture(&work, "chained.md");

    notecue(work.path())
        .arg("stamp")
        .arg(&note)
        .args(["--at", "100", "--write"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Inserted"))
        .stdout(predicate::str::contains("auto-jumps"));

    let updated = fs::read_to_string(&note).unwrap();
    assert!(updated.contains("[00:02:30-00:02:33, 100%, 1.00x, ->]"));
    assert!(updated.contains("[00:01:40-00:01:45, 100%, 1.00x]"));
}

// ============================================================================
// simulate
// ============================================================================

#[test]
fn simulate_reports_engine_activity() {
    let config = TempDir::new().unwrap();
    notecue(config.path())
        .arg("simulate")
        .arg(fixtures_dir().join("lecture.md"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Entered #0"))
        .stdout(predicate::str::contains("Entered #2"))
        .stdout(predicate::str::contains("Simulated"));
}

#[test]
fn simulate_rejects_unknown_activation_index() {
    let config = TempDir::new().unwrap();
    notecue(config.path())
        .arg("simulate")
        .arg(fixtures_dir().join("lecture.md"))
        .args(["--activate", "7@1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No directive #7"));
}

#[test]
fn simulate_rejects_malformed_seek() {
    let config = TempDir::new().unwrap();
    notecue(config.path())
        .arg("simulate")
        .arg(fixtures_dir().join("lecture.md"))
        .args(["--seek", "soon"])
        .assert()
        .failure();
}

// ============================================================================
// config
// ============================================================================

#[test]
fn config_path_honors_override() {
    let config = TempDir::new().unwrap();
    notecue(config.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_migrate_creates_missing_file() {
    let config = TempDir::new().unwrap();
    notecue(config.path())
        .args(["config", "migrate", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created"));

    let written = fs::read_to_string(config.path().join("config.toml")).unwrap();
    assert!(written.contains("[playback]"));
    assert!(written.contains("[engine]"));
}

#[test]
fn config_migrate_is_idempotent() {
    let config = TempDir::new().unwrap();
    notecue(config.path()).args(["config", "migrate", "--yes"]).assert().success();
    notecue(config.path())
        .args(["config", "migrate", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already up to date"));
}

#[test]
fn broken_config_falls_back_to_defaults() {
    let config = TempDir::new().unwrap();
    fs::write(config.path().join("config.toml"), "[playback\nvolume = ").unwrap();
    notecue(config.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[playback]"));
}

// ============================================================================
// misc
// ============================================================================

#[test]
fn completions_for_bash() {
    let config = TempDir::new().unwrap();
    notecue(config.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("notecue"));
}

#[test]
fn version_flag() {
    let config = TempDir::new().unwrap();
    notecue(config.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("notecue "));
}
