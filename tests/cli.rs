use assert_cmd::Command;
use predicates::prelude::*;

fn numview() -> Command { Command::cargo_bin("numview").unwrap() }

#[test]
fn runs_one_demo() {
    numview()
        .arg("globals")
        .assert()
        .success()
        .stdout(predicate::str::ends_with("10\n10\nsame object: True\n"));
}

#[test]
fn runs_all_by_default() {
    numview()
        .assert()
        .success()
        .stdout(predicate::str::contains("__Print_1__").and(predicate::str::contains("same object: True")));
}

#[test]
fn unknown_demo_fails() {
    numview()
        .arg("reshape")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
