use assert_cmd::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn relay_prints_decoded_capture() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("plan.txt");
    fs::write(&file, "Plan%3A%201%20to%20add").unwrap();

    Command::new(assert_cmd::cargo::cargo_bin!("automap"))
        .args(["relay", "--action", "plan", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout("Plan: 1 to add\n");
}

#[test]
fn relay_never_fails_on_bad_input() {
    let temp = tempdir().unwrap();
    let empty = temp.path().join("empty.txt");
    fs::write(&empty, "").unwrap();

    Command::new(assert_cmd::cargo::cargo_bin!("automap"))
        .args(["relay", "--action", "apply", "--file"])
        .arg(&empty)
        .assert()
        .success()
        .stdout(predicates::str::contains("apply"));

    Command::new(assert_cmd::cargo::cargo_bin!("automap"))
        .args(["relay", "--action", "apply", "--file"])
        .arg(temp.path().join("missing.txt"))
        .assert()
        .success()
        .stdout(predicates::str::contains("Failed to read apply output"));
}
