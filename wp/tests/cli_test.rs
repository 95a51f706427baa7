//! End-to-end tests for the wp binary

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Minimal config pointing storage and logs into a temp dir
fn write_config(temp: &TempDir) -> std::path::PathBuf {
    let config_path = temp.path().join("config.yml");
    let yaml = format!(
        "storage:\n  db-path: {}\nlogging:\n  file: {}\n",
        temp.path().join("trips.db").display(),
        temp.path().join("wp.log").display(),
    );
    fs::write(&config_path, yaml).expect("Failed to write config");
    config_path
}

#[test]
fn test_help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("wp").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generate a new trip itinerary"))
        .stdout(predicate::str::contains("List stored trips"));
}

#[test]
fn test_trips_empty_database() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);

    let mut cmd = Command::cargo_bin("wp").unwrap();
    cmd.arg("--config")
        .arg(&config)
        .arg("trips")
        .assert()
        .success()
        .stdout(predicate::str::contains("No trips found"));
}

#[test]
fn test_show_missing_trip_fails() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);

    let mut cmd = Command::cargo_bin("wp").unwrap();
    cmd.arg("--config")
        .arg(&config)
        .arg("show")
        .arg("nope")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found"));
}

#[test]
fn test_plan_requires_api_key() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp);

    let mut cmd = Command::cargo_bin("wp").unwrap();
    cmd.env_remove("OPENROUTER_API_KEY")
        .arg("--config")
        .arg(&config)
        .arg("plan")
        .arg("Lisbon")
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key"));
}
