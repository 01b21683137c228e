//! End-to-end tests driving the mirror binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn mirror_cmd() -> Command {
    Command::cargo_bin("mirror").unwrap()
}

struct Dirs {
    _temp: TempDir,
    source: std::path::PathBuf,
    dest: std::path::PathBuf,
    state: std::path::PathBuf,
}

fn setup() -> Dirs {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("in");
    let dest = temp.path().join("out");
    let state = temp.path().join("state");
    fs::create_dir_all(&source).unwrap();
    Dirs {
        _temp: temp,
        source,
        dest,
        state,
    }
}

#[test]
fn help_lists_the_flags() {
    mirror_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--interval"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--immediate-deletes"));
}

#[test]
fn single_cycle_mirrors_a_file() {
    let dirs = setup();
    fs::write(dirs.source.join("hello.txt"), "hi").unwrap();

    mirror_cmd()
        .arg(&dirs.source)
        .arg(&dirs.dest)
        .arg("--state-dir")
        .arg(&dirs.state)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created hello.txt"));

    assert_eq!(
        fs::read_to_string(dirs.dest.join("hello.txt")).unwrap(),
        "hi"
    );
    assert!(dirs.state.join("locations.toml").exists());
}

#[test]
fn json_report_is_parseable() {
    let dirs = setup();
    fs::write(dirs.source.join("hello.txt"), "hi").unwrap();

    let output = mirror_cmd()
        .arg(&dirs.source)
        .arg(&dirs.dest)
        .arg("--state-dir")
        .arg(&dirs.state)
        .arg("--json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["success"], serde_json::json!(true));
    assert!(!report["actions"].as_array().unwrap().is_empty());
}

#[test]
fn dry_run_leaves_the_destination_untouched() {
    let dirs = setup();
    fs::write(dirs.source.join("hello.txt"), "hi").unwrap();

    mirror_cmd()
        .arg(&dirs.source)
        .arg(&dirs.dest)
        .arg("--state-dir")
        .arg(&dirs.state)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("[dry-run] Would create hello.txt"));

    assert!(!dirs.dest.exists());
}

#[test]
fn immediate_deletes_apply_across_single_shot_runs() {
    // the deferral queue lives in process memory, so repeated single-shot
    // invocations need --immediate-deletes for orphans to go away
    let dirs = setup();
    fs::write(dirs.source.join("hello.txt"), "hi").unwrap();

    let run = |label: &str| {
        mirror_cmd()
            .arg(&dirs.source)
            .arg(&dirs.dest)
            .arg("--state-dir")
            .arg(&dirs.state)
            .arg("--immediate-deletes")
            .assert()
            .success()
            .stdout(predicate::str::contains(label));
    };

    run("Created hello.txt");
    fs::remove_file(dirs.source.join("hello.txt")).unwrap();
    run("Deleted hello.txt");

    assert!(!dirs.dest.join("hello.txt").exists());
}

#[test]
fn missing_source_is_reported_as_a_failure() {
    let dirs = setup();
    fs::remove_dir_all(&dirs.source).unwrap();

    mirror_cmd()
        .arg(&dirs.source)
        .arg(&dirs.dest)
        .arg("--state-dir")
        .arg(&dirs.state)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}
