use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_check_prints_canonical_form() {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("check").arg("(base+bonus)*level");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(base + bonus) * level"))
        .stdout(predicate::str::contains("arithmetic"))
        .stdout(predicate::str::contains("base, bonus, level"));
}

#[test]
fn test_cli_check_does_not_need_bindings() {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("check").arg("score >= threshold");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("boolean"));
}

#[test]
fn test_cli_check_type_error() {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("check").arg("alive && hp");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Type error"))
        .stderr(predicate::str::contains("compare the value instead"));
}

#[test]
fn test_cli_operators_table() {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("operators");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Precedence"))
        .stdout(predicate::str::contains("&&"))
        .stdout(predicate::str::contains("pow"))
        .stdout(predicate::str::contains("abs"));
}
