//! Integration tests for CLI commands.
//!
//! Sessions run over a replay script, so the full enroll/check flow works
//! without a camera.

#![allow(deprecated)] // Command::cargo_bin is deprecated but replacement requires newer assert_cmd

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ONE_FACE: &str = r#"{
  "frames": [
    { "faces": [ { "region": { "top": 40, "right": 200, "bottom": 180, "left": 60 },
                   "signature": [0.12, -0.08, 0.33] } ] }
  ]
}"#;

const NO_FACES: &str = r#"{ "frames": [ { "faces": [] } ] }"#;

/// A facegate command isolated from the user's own configuration.
fn facegate(project: &Path) -> Command {
    let mut cmd = Command::cargo_bin("facegate").unwrap();
    cmd.env("HOME", project)
        .env_remove("XDG_CONFIG_HOME")
        .args(["--no-color", "-C"])
        .arg(project);
    cmd
}

fn project_with_script(script: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("script.json"), script).unwrap();
    temp
}

// ============================================================================
// Help and static output
// ============================================================================

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("facegate")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("roles"))
        .stdout(predicate::str::contains("identities"));
}

#[test]
fn roles_prints_hierarchy_in_depth_first_order() {
    let temp = TempDir::new().unwrap();
    facegate(temp.path())
        .arg("roles")
        .assert()
        .success()
        .stdout(predicate::str::contains("CEO [All_Files]"))
        .stdout(predicate::str::contains("    Employee [Employee_Level_Files]"))
        .stdout(predicate::str::contains(
            "Valid roles are: CEO, Manager, Employee",
        ));
}

#[test]
fn version_shows_store_format() {
    let temp = TempDir::new().unwrap();
    facegate(temp.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("Identity store format: v1"));
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn config_reflects_project_file() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("facegate.toml"),
        "[recognition]\ntolerance = 0.4\n",
    )
    .unwrap();

    facegate(temp.path())
        .args(["config", "--format", "toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tolerance = 0.4"))
        .stdout(predicate::str::contains("[camera]"));
}

#[test]
fn config_rejects_unknown_format() {
    let temp = TempDir::new().unwrap();
    facegate(temp.path())
        .args(["config", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown format"));
}

// ============================================================================
// Interactive session
// ============================================================================

#[test]
fn run_requires_a_replay_script() {
    let temp = TempDir::new().unwrap();
    facegate(temp.path())
        .arg("run")
        .write_stdin("q\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No replay script configured"));
}

#[test]
fn enroll_then_check_access() {
    let temp = project_with_script(ONE_FACE);

    facegate(temp.path())
        .args(["run", "--script", "script.json"])
        .write_stdin(
            "l\nJanitor\n manager \nc /srv/Manager_Level_Files/q3.xlsx\nc /srv/All_Files/plan.docx\nq\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid role 'Janitor'."))
        .stdout(predicate::str::contains(
            "Valid roles are: CEO, Manager, Employee",
        ))
        .stdout(predicate::str::contains("You have been recognized as Manager."))
        .stdout(predicate::str::contains("Checking file access for Manager..."))
        .stdout(predicate::str::contains(
            "Access granted to /srv/Manager_Level_Files/q3.xlsx",
        ))
        .stdout(predicate::str::contains(
            "Access denied to /srv/All_Files/plan.docx",
        ));

    // The enrollment survives the session.
    facegate(temp.path())
        .arg("identities")
        .assert()
        .success()
        .stdout(predicate::str::contains("Manager_Level_Files"))
        .stdout(predicate::str::contains("(1 identity)"));
}

#[test]
fn check_without_identity_is_refused() {
    let temp = project_with_script(ONE_FACE);

    facegate(temp.path())
        .args(["run", "--script", "script.json"])
        .write_stdin("check /srv/Employee_Level_Files/a.txt\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No recognized identity"));
}

#[test]
fn enroll_without_face_is_reported() {
    let temp = project_with_script(NO_FACES);

    facegate(temp.path())
        .args(["run", "--script", "script.json"])
        .write_stdin("l\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No face detected"));

    facegate(temp.path())
        .arg("identities")
        .assert()
        .success()
        .stdout(predicate::str::contains("No identities enrolled."));
}

#[test]
fn end_of_input_cancels_enrollment() {
    let temp = project_with_script(ONE_FACE);

    facegate(temp.path())
        .args(["run", "--script", "script.json"])
        .write_stdin("l\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Enrollment cancelled."))
        .stdout(predicate::str::contains("Goodbye!"));
}

#[test]
fn status_and_toggle() {
    let temp = project_with_script(ONE_FACE);

    facegate(temp.path())
        .args(["run", "--script", "script.json"])
        .write_stdin("status\nf\nf\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current identity"))
        .stdout(predicate::str::contains("Face recognition started."))
        .stdout(predicate::str::contains("Face recognition stopped."));
}

#[test]
fn corrupt_store_fails_startup() {
    let temp = project_with_script(ONE_FACE);
    fs::create_dir_all(temp.path().join(".facegate")).unwrap();
    fs::write(temp.path().join(".facegate/identities.json"), "garbage").unwrap();

    facegate(temp.path())
        .args(["run", "--script", "script.json"])
        .write_stdin("q\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("corrupt"));
}

#[test]
fn store_load_is_logged_once() {
    let temp = project_with_script(ONE_FACE);

    facegate(temp.path())
        .args(["run", "--script", "script.json"])
        .env_remove("RUST_LOG")
        .write_stdin("q\n")
        .assert()
        .success()
        .stderr(
            predicate::function(|stderr: &str| {
                stderr.matches("Identity store loaded").count() == 1
            })
            .from_utf8(),
        );
}
