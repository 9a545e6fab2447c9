//! End-to-end tests for the `tt` binary against a temporary data directory.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::Value;

fn tt(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tt").expect("binary");
    cmd.env_remove("TASKTRACKER_DIR")
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn add(data_dir: &Path, report: &str, extra: &[&str]) {
    tt(data_dir)
        .args(["add", report, "--type", "Dev", "--desc", "something to do", "--date", "2024-05-01"])
        .args(extra)
        .assert()
        .success()
        .stdout(contains(format!("({report})")));
}

fn stored_tasks(data_dir: &Path) -> Vec<Value> {
    let raw = fs::read_to_string(data_dir.join("tasks.json")).expect("tasks.json");
    serde_json::from_str(&raw).expect("valid json")
}

fn id_of(data_dir: &Path, report: &str) -> String {
    stored_tasks(data_dir)
        .into_iter()
        .find(|t| t["report"] == report)
        .and_then(|t| t["id"].as_str().map(str::to_string))
        .expect("task present")
}

#[test]
fn help_works() {
    Command::cargo_bin("tt")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("kanban"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "ui", "add", "list", "view", "update", "delete", "deps", "board", "calendar", "dashboard",
        "completions",
    ];
    for cmd in subcommands {
        Command::cargo_bin("tt")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn add_then_list_and_board() {
    let dir = tempfile::tempdir().unwrap();
    add(dir.path(), "R1", &["--priority", "high"]);
    add(dir.path(), "R2", &["--status", "in-review", "--dependency", "R1"]);

    let tasks = stored_tasks(dir.path());
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["type"], "Dev");
    assert_eq!(tasks[0]["date"], "2024-05-01");
    assert_eq!(tasks[0]["priority"], "High");
    assert_eq!(tasks[1]["status"], "InReview");
    assert_eq!(tasks[1]["dependency"], "R1");

    tt(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(contains("R1").and(contains("May 1, 2024")).and(contains("In Review")));

    tt(dir.path())
        .args(["board"])
        .assert()
        .success()
        .stdout(
            contains("== Pending (1) ==")
                .and(contains("== In Review (1) =="))
                .and(contains("== Completed (0) =="))
                .and(contains("<- R1")),
        );
}

#[test]
fn list_filters_and_empty_state() {
    let dir = tempfile::tempdir().unwrap();
    tt(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(contains("No tasks."));

    add(dir.path(), "R1", &[]);
    add(dir.path(), "R2", &["--status", "completed"]);

    tt(dir.path())
        .args(["list", "--status", "completed"])
        .assert()
        .success()
        .stdout(contains("R2").and(contains("R1").not()));
}

#[test]
fn unknown_dependency_is_a_user_error() {
    let dir = tempfile::tempdir().unwrap();
    tt(dir.path())
        .args(["add", "R1", "--type", "Dev", "--desc", "d", "--dependency", "ghost"])
        .assert()
        .code(2)
        .stderr(contains("ghost"));
    assert!(!dir.path().join("tasks.json").exists());
}

#[test]
fn blocked_delete_then_cascade() {
    let dir = tempfile::tempdir().unwrap();
    add(dir.path(), "R1", &[]);
    add(dir.path(), "R2", &["--dependency", "R1"]);
    let r1 = id_of(dir.path(), "R1");

    tt(dir.path())
        .args(["delete", &r1])
        .assert()
        .code(3)
        .stderr(contains("R2").and(contains("--cascade")));
    assert_eq!(stored_tasks(dir.path()).len(), 2);

    tt(dir.path())
        .args(["delete", &r1, "--cascade"])
        .assert()
        .success()
        .stdout(contains("Deleted task"));

    let tasks = stored_tasks(dir.path());
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["report"], "R2");
    assert_eq!(tasks[0]["dependency"], "");
}

#[test]
fn update_renames_and_repoints_dependents() {
    let dir = tempfile::tempdir().unwrap();
    add(dir.path(), "R1", &[]);
    add(dir.path(), "R2", &["--dependency", "R1"]);
    let r1 = id_of(dir.path(), "R1");

    tt(dir.path())
        .args(["update", &r1, "--report", "Login", "--status", "completed"])
        .assert()
        .success()
        .stdout(contains("Updated task"));

    let tasks = stored_tasks(dir.path());
    assert_eq!(tasks[0]["report"], "Login");
    assert_eq!(tasks[0]["status"], "Completed");
    assert_eq!(tasks[1]["dependency"], "Login");
}

#[test]
fn deps_excludes_task_being_edited() {
    let dir = tempfile::tempdir().unwrap();
    add(dir.path(), "R1", &[]);
    add(dir.path(), "R2", &[]);
    let r1 = id_of(dir.path(), "R1");

    tt(dir.path())
        .args(["deps", "--editing", &r1])
        .assert()
        .success()
        .stdout("None\nR2\n");
}

#[test]
fn missing_task_is_a_user_error() {
    let dir = tempfile::tempdir().unwrap();
    tt(dir.path())
        .args(["view", "12345"])
        .assert()
        .code(2)
        .stderr(contains("12345"));
}

#[test]
fn calendar_places_tasks_on_their_day() {
    let dir = tempfile::tempdir().unwrap();
    add(dir.path(), "R1", &[]);

    tt(dir.path())
        .args(["calendar", "--month", "2024-05"])
        .assert()
        .success()
        .stdout(
            contains("May 2024")
                .and(contains("   Mon   Tue   Wed"))
                .and(contains("1*1"))
                .and(contains("May 1: R1 [Pending]")),
        );

    tt(dir.path())
        .args(["calendar", "--month", "2024-13"])
        .assert()
        .code(2);
}

#[test]
fn dashboard_counts() {
    let dir = tempfile::tempdir().unwrap();
    add(dir.path(), "R1", &["--status", "completed"]);
    add(dir.path(), "R2", &[]);

    tt(dir.path())
        .arg("dashboard")
        .assert()
        .success()
        .stdout(
            contains("Tasks: 2 (50% completed)")
                .and(contains("By type"))
                .and(contains("Activity")),
        );
    assert!(dir.path().join("task_history.json").exists());
}

#[test]
fn corrupt_data_is_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("tasks.json"), "{not json").unwrap();

    tt(dir.path()).arg("list").assert().code(4);
    tt(dir.path())
        .args(["add", "R1", "--type", "Dev", "--desc", "d"])
        .assert()
        .code(4);
    assert_eq!(
        fs::read_to_string(dir.path().join("tasks.json")).unwrap(),
        "{not json"
    );
}

#[test]
fn invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "[dashboard]\ntrend_months = 0\n").unwrap();
    tt(dir.path()).arg("list").assert().code(2);
}

#[test]
fn data_dir_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("tt")
        .expect("binary")
        .env("TASKTRACKER_DIR", dir.path())
        .args(["add", "R1", "--type", "Ops", "--desc", "d"])
        .assert()
        .success();
    assert_eq!(stored_tasks(dir.path()).len(), 1);
}

#[test]
fn completions_generate() {
    Command::cargo_bin("tt")
        .expect("binary")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(contains("tt"));
}
