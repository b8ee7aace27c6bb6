use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_repricer_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("repricer")
}

/// Command isolated from the caller's environment and any `.env` in the repo
fn repricer(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::new(get_repricer_bin());
    cmd.current_dir(dir.path())
        .env_remove("TCGPLAYER_USERNAME")
        .env_remove("TCGPLAYER_PASSWORD")
        .env_remove("REPRICER_FILE")
        .env_remove("REPRICER_CATALOG_URL")
        .env_remove("REPRICER_CATEGORY");
    cmd
}

fn inventory(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("inventory.csv");
    std::fs::write(&path, "Magic,Magic 2010,Lightning Bolt,146,C,2,$1.10,,English,\n").unwrap();
    path
}

#[test]
fn test_run_command_help() {
    let mut cmd = Command::new(get_repricer_bin());
    cmd.arg("run").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--file"))
        .stdout(predicate::str::contains("--catalog-url"))
        .stdout(predicate::str::contains("--on-not-found"))
        .stdout(predicate::str::contains("--max-attempts"))
        .stdout(predicate::str::contains("TCGPLAYER_USERNAME"));
}

#[test]
fn test_run_help_hides_credentials_from_environment() {
    let mut cmd = Command::new(get_repricer_bin());
    cmd.env("TCGPLAYER_PASSWORD", "s3cret-value")
        .arg("run")
        .arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("s3cret-value").not());
}

#[test]
fn test_run_without_credentials_fails_before_browser() {
    let dir = tempfile::tempdir().unwrap();
    let file = inventory(&dir);

    repricer(&dir)
        .arg("run")
        .arg("--file")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("TCGPLAYER_USERNAME"))
        .stderr(predicate::str::contains("username is missing"));

    assert!(!dir.path().join("logs").exists());
}

#[test]
fn test_run_rejects_invalid_catalog_url() {
    let dir = tempfile::tempdir().unwrap();
    let file = inventory(&dir);

    repricer(&dir)
        .env("TCGPLAYER_USERNAME", "seller@example.com")
        .env("TCGPLAYER_PASSWORD", "hunter2")
        .arg("run")
        .arg("--file")
        .arg(&file)
        .arg("--catalog-url")
        .arg("ftp://store.example.com/catalog")
        .assert()
        .failure()
        .stderr(predicate::str::contains("catalog URL must be http(s)"));
}

#[test]
fn test_run_with_missing_inventory_fails() {
    let dir = tempfile::tempdir().unwrap();

    repricer(&dir)
        .arg("run")
        .arg("--file")
        .arg(dir.path().join("missing.csv"))
        .arg("--username")
        .arg("seller@example.com")
        .arg("--password")
        .arg("hunter2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("inventory file not found"));
}

#[test]
fn test_run_rejects_zero_attempts() {
    let dir = tempfile::tempdir().unwrap();
    let file = inventory(&dir);

    repricer(&dir)
        .arg("run")
        .arg("--file")
        .arg(&file)
        .arg("--max-attempts")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_profile_and_temp_profile_conflict() {
    let dir = tempfile::tempdir().unwrap();
    let file = inventory(&dir);

    repricer(&dir)
        .arg("run")
        .arg("--file")
        .arg(&file)
        .arg("--profile")
        .arg("seller")
        .arg("--temp-profile")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_main_help_lists_commands() {
    let mut cmd = Command::new(get_repricer_bin());
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("reset"))
        .stdout(predicate::str::contains("completion"));
}
