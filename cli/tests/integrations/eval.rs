use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_eval_raw() {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("eval").arg("2 + 3 * 4").arg("--raw");

    cmd.assert().success().stdout("14\n");
}

#[test]
fn test_cli_eval_with_bindings() {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("eval")
        .arg("level > 10 ? base * 2 : base + level")
        .arg("level=12")
        .arg("base=40");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("level"))
        .stdout(predicate::str::contains("base"))
        .stdout(predicate::str::contains("= 80"));
}

#[test]
fn test_cli_eval_boolean_result() {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("eval").arg("hp > 0 && mana >= 10").arg("hp=5").arg("mana=10");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1 (true)"));
}

#[test]
fn test_cli_eval_json() {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("eval").arg("1/4").arg("--json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"expression\": \"1 / 4\""))
        .stdout(predicate::str::contains("\"type\": \"arithmetic\""))
        .stdout(predicate::str::contains("\"value\": \"0.25\""));
}

#[test]
fn test_cli_eval_undefined_variable() {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("eval").arg("hp * armor").arg("hp=3");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Undefined variable 'armor'"));
}

#[test]
fn test_cli_eval_syntax_error() {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("eval").arg("(hp + 1");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Syntax error"))
        .stderr(predicate::str::contains("add the missing ')'"));
}

#[test]
fn test_cli_eval_division_by_zero() {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("eval").arg("gold / players").arg("gold=10").arg("players=0");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Arithmetic error"));
}

#[test]
fn test_cli_eval_invalid_assignment() {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("eval").arg("hp + 1").arg("hp=lots");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("hp"));
}

#[test]
fn test_cli_max_depth() {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("--max-depth")
        .arg("2")
        .arg("eval")
        .arg("(((x)))")
        .arg("x=1");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("max_expression_depth"));
}
