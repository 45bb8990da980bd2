use assert_cmd::Command;

#[test]
fn test_interactive_mode_help() {
    // Interactive mode needs a terminal, so only check the flag is documented
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("eval").arg("--help");

    let output = cmd.assert().success();
    output.stdout(predicates::str::contains("--interactive"));
}

#[test]
fn test_interactive_mode_skips_prompt_when_bound() {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.arg("eval").arg("a + b").arg("a=1").arg("b=2").arg("-i").arg("--raw");

    cmd.assert().success().stdout("3\n");
}
