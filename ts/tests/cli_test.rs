//! End-to-end tests for the tripstore binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("tripstore").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("List stored trips"))
        .stdout(predicate::str::contains("Show store statistics"));
}

#[test]
fn test_list_empty_database() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("trips.db");

    let mut cmd = Command::cargo_bin("tripstore").unwrap();
    cmd.arg("--db")
        .arg(&db)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No trips found"));
}

#[test]
fn test_show_missing_trip_fails() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("trips.db");

    let mut cmd = Command::cargo_bin("tripstore").unwrap();
    cmd.arg("--db")
        .arg(&db)
        .arg("show")
        .arg("nope")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Trip not found"));
}

#[test]
fn test_stats_empty_database() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("trips.db");

    let mut cmd = Command::cargo_bin("tripstore").unwrap();
    cmd.arg("--db")
        .arg(&db)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Trips: 0"));
}
