use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const ECONOMY: &str = r#"
# economy.tally
income    = workers * rate + (market_bonus > 0 ? market_bonus : 0)
tax       = income * 0.15
can_build = income - tax >= cost
"#;

fn economy_file(temp_dir: &TempDir) -> std::path::PathBuf {
    let path = temp_dir.path().join("economy.tally");
    fs::write(&path, ECONOMY).unwrap();
    path
}

#[test]
fn test_cli_run_all_formulas() {
    let temp_dir = TempDir::new().unwrap();
    let file = economy_file(&temp_dir);

    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("run")
        .arg(&file)
        .arg("workers=12")
        .arg("rate=2.5")
        .arg("market_bonus=5")
        .arg("cost=25");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("income"))
        .stdout(predicate::str::contains("35"))
        .stdout(predicate::str::contains("5.25"))
        .stdout(predicate::str::contains("can_build"))
        .stdout(predicate::str::contains("1 (true)"));
}

#[test]
fn test_cli_run_selected_formulas() {
    let temp_dir = TempDir::new().unwrap();
    let file = economy_file(&temp_dir);

    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("run")
        .arg(&file)
        .arg("tax")
        .arg("workers=12")
        .arg("rate=2.5")
        .arg("market_bonus=0");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("4.5"))
        .stdout(predicate::str::contains("can_build").not());
}

#[test]
fn test_cli_run_json() {
    let temp_dir = TempDir::new().unwrap();
    let file = economy_file(&temp_dir);

    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("run")
        .arg(&file)
        .arg("income,tax")
        .arg("workers=2")
        .arg("rate=10")
        .arg("market_bonus=0")
        .arg("--json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"income\""))
        .stdout(predicate::str::contains("\"value\": \"20\""))
        .stdout(predicate::str::contains("\"value\": \"3\""));
}

#[test]
fn test_cli_run_missing_variable_fails() {
    let temp_dir = TempDir::new().unwrap();
    let file = economy_file(&temp_dir);

    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("run").arg(&file).arg("workers=12");

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Undefined variable"))
        .stderr(predicate::str::contains("failed to evaluate"));
}

#[test]
fn test_cli_run_unknown_formula() {
    let temp_dir = TempDir::new().unwrap();
    let file = economy_file(&temp_dir);

    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("run").arg(&file).arg("profit");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_run_invalid_file() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("broken.tally");
    fs::write(&file, "damage = base *\n").unwrap();

    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("run").arg(&file);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("broken.tally"))
        .stderr(predicate::str::contains("error").or(predicate::str::contains("Error")));
}

#[test]
fn test_cli_run_nonexistent_file() {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("run").arg("does-not-exist.tally");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read formula file"));
}
