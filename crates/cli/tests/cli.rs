//! Smoke tests for the `omni` binary surface.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_config_flags() {
    let mut cmd = Command::cargo_bin("omni").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--backend-url"))
        .stdout(predicate::str::contains("--store-url"))
        .stdout(predicate::str::contains("--store-key"));
}

#[test]
fn version_flag_succeeds() {
    let mut cmd = Command::cargo_bin("omni").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("omni"));
}

#[test]
fn unknown_flag_is_rejected() {
    let mut cmd = Command::cargo_bin("omni").unwrap();
    cmd.arg("--no-such-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}
