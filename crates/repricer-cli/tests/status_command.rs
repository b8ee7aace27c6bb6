use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_repricer_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("repricer")
}

const INVENTORY: &str = "\
Product Line,Set Name,Product Name,Number,Rarity,Quantity,TCG Marketplace Price,Foil,Language,Status
Magic,Dominaria,Opt,60,C,4,$0.25,,English,SUCCESS
Magic,Magic 2010,Lightning Bolt,146,C,2,$1.10,,English,
Magic,Zendikar,Island,231,L,1,$2.00,Foil,English,FOIL
Magic,Kaldheim,Shock,153,C,3,$0.20,,Japanese,
";

fn inventory() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.csv");
    std::fs::write(&path, INVENTORY).unwrap();
    (dir, path)
}

#[test]
fn test_status_command_help() {
    let mut cmd = Command::new(get_repricer_bin());
    cmd.arg("status").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Show how many rows carry each status"));
}

#[test]
fn test_status_pretty_counts_rows() {
    let (_dir, path) = inventory();

    let mut cmd = Command::new(get_repricer_bin());
    cmd.arg("status").arg(&path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Rows: 4"))
        .stdout(predicate::str::contains("2 rows left to process"));
}

#[test]
fn test_status_json_reports_counts_per_status() {
    let (_dir, path) = inventory();

    let output = Command::new(get_repricer_bin())
        .arg("--format")
        .arg("json")
        .arg("status")
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["rows"], 4);
    assert_eq!(report["has_header"], true);
    assert_eq!(report["pending"], 2);

    let counts = report["counts"].as_array().unwrap();
    let count_of = |status: &str| {
        counts
            .iter()
            .find(|c| c["status"] == status)
            .map(|c| c["rows"].as_u64().unwrap())
            .unwrap()
    };
    assert_eq!(count_of("SUCCESS"), 1);
    assert_eq!(count_of("FOIL"), 1);
    assert_eq!(count_of("FAILED"), 0);
}

#[test]
fn test_status_does_not_modify_file() {
    let (dir, path) = inventory();

    Command::new(get_repricer_bin())
        .arg("status")
        .arg(&path)
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), INVENTORY);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_status_missing_file() {
    let mut cmd = Command::new(get_repricer_bin());
    cmd.arg("status").arg("/nonexistent/inventory.csv");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("inventory file not found"));
}
