//! Integration tests for the runlog binary.
//!
//! These tests verify end-to-end behavior including:
//! - Parse and validation failures surfacing as messages
//! - Text and JSON reports
//! - CSV export
//! - Config file fallbacks

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SAMPLE: &str = "\
date,person,miles
2024-01-01,Alice,3
2024-01-02,Bob,5
2024-01-03,Alice,4
2024-01-04,Alice,5
2024-01-05,Bob,2
2024-01-08,Alice,6
";

/// Helper to create a test directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write a run log into the test directory
fn write_log(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write run log");
    path
}

/// Helper to get the CLI binary with config lookups confined to `dir`
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("runlog"));
    cmd.env("XDG_CONFIG_HOME", dir)
        .env("HOME", dir)
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Running log statistics and forecasts"));
}

#[test]
fn test_check_valid_log() {
    let temp_dir = setup_test_dir();
    let log = write_log(temp_dir.path(), "runs.csv", SAMPLE);

    cli(temp_dir.path())
        .arg("check")
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("6 runs from 2 runners"));
}

#[test]
fn test_check_reports_row_error() {
    let temp_dir = setup_test_dir();
    let log = write_log(temp_dir.path(), "bad.csv", "date,person,miles\n2024-01-01,,5\n");

    cli(temp_dir.path())
        .arg("check")
        .arg(&log)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Row 2: Person name is required"));
}

#[test]
fn test_empty_log_fails() {
    let temp_dir = setup_test_dir();
    let log = write_log(temp_dir.path(), "empty.csv", "date,person,miles\n");

    cli(temp_dir.path())
        .arg("summary")
        .arg(&log)
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty or has no data rows"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_summary_text() {
    let temp_dir = setup_test_dir();
    let log = write_log(temp_dir.path(), "runs.csv", SAMPLE);

    cli(temp_dir.path())
        .arg("summary")
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("ALL RUNNERS"))
        .stdout(predicate::str::contains("Total:           25.0 mi"))
        .stdout(predicate::str::contains("1. Alice"));
}

#[test]
fn test_summary_json() {
    let temp_dir = setup_test_dir();
    let log = write_log(temp_dir.path(), "runs.csv", SAMPLE);

    let output = cli(temp_dir.path())
        .arg("summary")
        .arg(&log)
        .arg("--json")
        .output()
        .expect("Failed to run runlog");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Summary is not JSON");
    assert_eq!(json["metrics"]["count"], 6);
    assert_eq!(json["metrics"]["total"], 25.0);
    assert_eq!(json["runners"]["Bob"]["total"], 7.0);
    assert_eq!(json["leaderboard"][0]["person"], "Alice");
    assert_eq!(json["weekly"][0]["week"], "2024-W01");
}

#[test]
fn test_person_json_forecast() {
    let temp_dir = setup_test_dir();
    let log = write_log(temp_dir.path(), "runs.csv", SAMPLE);

    let output = cli(temp_dir.path())
        .args(["person", "Alice"])
        .arg(&log)
        .arg("--json")
        .output()
        .expect("Failed to run runlog");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Person report is not JSON");
    assert_eq!(json["person"], "Alice");
    assert_eq!(json["metrics"]["trend"], "improving");
    assert_eq!(json["prediction"]["next_week_prediction"], 13.0);
    assert_eq!(json["trend_line"].as_array().map(Vec::len), Some(4));
}

#[test]
fn test_unknown_person_fails() {
    let temp_dir = setup_test_dir();
    let log = write_log(temp_dir.path(), "runs.csv", SAMPLE);

    cli(temp_dir.path())
        .args(["person", "Carol"])
        .arg(&log)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No runs found for \"Carol\""));
}

#[test]
fn test_compare_is_alphabetical() {
    let temp_dir = setup_test_dir();
    let log = write_log(
        temp_dir.path(),
        "runs.csv",
        "date,person,miles\n2024-01-01,Zoe,1\n2024-01-02,Adam,2\n",
    );

    let output = cli(temp_dir.path())
        .arg("compare")
        .arg(&log)
        .output()
        .expect("Failed to run runlog");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let adam = stdout.find("Adam").unwrap();
    let zoe = stdout.find("Zoe").unwrap();
    assert!(adam < zoe);
}

#[test]
fn test_export_daily_to_file() {
    let temp_dir = setup_test_dir();
    let log = write_log(temp_dir.path(), "runs.csv", SAMPLE);
    let out = temp_dir.path().join("exports").join("daily.csv");

    cli(temp_dir.path())
        .args(["export", "daily"])
        .arg(&log)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote 6 rows"));

    let contents = fs::read_to_string(&out).expect("Failed to read export");
    assert!(contents.starts_with("date,miles\n2024-01-01,3.0\n"));
}

#[test]
fn test_export_trend_to_stdout() {
    let temp_dir = setup_test_dir();
    let log = write_log(temp_dir.path(), "runs.csv", SAMPLE);

    cli(temp_dir.path())
        .args(["export", "trend"])
        .arg(&log)
        .args(["--person", "Bob", "--window", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("date,miles,moving_average"))
        .stdout(predicate::str::contains("2024-01-05,2.0,3.5"));
}

#[test]
fn test_export_trend_requires_person() {
    let temp_dir = setup_test_dir();
    let log = write_log(temp_dir.path(), "runs.csv", SAMPLE);

    cli(temp_dir.path())
        .args(["export", "trend"])
        .arg(&log)
        .assert()
        .failure();
}

#[test]
fn test_zero_window_rejected() {
    let temp_dir = setup_test_dir();
    let log = write_log(temp_dir.path(), "runs.csv", SAMPLE);

    cli(temp_dir.path())
        .args(["person", "Alice"])
        .arg(&log)
        .args(["--window", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--window must be at least 1"))
        .stdout(predicate::str::is_empty());

    cli(temp_dir.path())
        .args(["export", "trend"])
        .arg(&log)
        .args(["--person", "Bob", "--window", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--window must be at least 1"));
}

#[test]
fn test_missing_file_without_config() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("summary")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No run log given"));
}

#[test]
fn test_config_default_csv_and_json() {
    let temp_dir = setup_test_dir();
    let log = write_log(temp_dir.path(), "runs.csv", SAMPLE);
    let config_path = temp_dir.path().join("custom.toml");
    fs::write(
        &config_path,
        format!(
            "[data]\ndefault_csv = {:?}\n\n[report]\njson = true\n",
            log.display().to_string()
        ),
    )
    .unwrap();

    let output = cli(temp_dir.path())
        .arg("--config")
        .arg(&config_path)
        .arg("summary")
        .output()
        .expect("Failed to run runlog");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Summary is not JSON");
    assert_eq!(json["metrics"]["count"], 6);
}
