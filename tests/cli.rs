use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn write_valid_trigger(root: &Path, name: &str) {
    let dir = root.join(name);
    create_dir_all(dir.join("assets")).expect("create trigger dirs");
    File::create(dir.join("call-ended"))
        .unwrap()
        .write_all(b"#!/bin/bash\n")
        .unwrap();
    File::create(dir.join("README.md"))
        .unwrap()
        .write_all(b"# readme\n")
        .unwrap();
    File::create(dir.join("config.json"))
        .unwrap()
        .write_all(
            br#"{"name": "T", "description": "D", "platforms": ["windows"], "language": "nodejs"}"#,
        )
        .unwrap();
    File::create(dir.join("assets/icon.png"))
        .unwrap()
        .write_all(b"\x89PNG")
        .unwrap();
}

#[test]
fn validate_succeeds_on_a_well_formed_directory() {
    let tmp = tempdir().unwrap();
    write_valid_trigger(tmp.path(), "good-trigger");

    let mut cmd = Command::cargo_bin("trigger-registry").expect("binary exists");
    cmd.arg("validate").arg("--root").arg(tmp.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("All triggers passed validation"));
}

#[test]
fn validate_exits_nonzero_and_prints_diagnostics_on_failure() {
    let tmp = tempdir().unwrap();
    write_valid_trigger(tmp.path(), "bad-trigger");
    std::fs::remove_file(tmp.path().join("bad-trigger/assets/icon.png")).unwrap();

    let mut cmd = Command::cargo_bin("trigger-registry").expect("binary exists");
    cmd.arg("validate").arg("--root").arg(tmp.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("assets/icon.png"))
        .stderr(predicate::str::contains(
            "Some triggers failed validation. Cowardly refusing to proceed.",
        ));
}

#[test]
fn validate_succeeds_on_an_empty_directory() {
    let tmp = tempdir().unwrap();

    let mut cmd = Command::cargo_bin("trigger-registry").expect("binary exists");
    cmd.arg("validate").arg("--root").arg(tmp.path());

    cmd.assert().success();
}
