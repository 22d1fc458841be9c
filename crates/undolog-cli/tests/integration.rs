#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn undolog(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("undolog").unwrap();
    cmd.current_dir(dir.path())
        .env("UNDOLOG_ROOT", dir.path())
        .env_remove("UNDOLOG_USER")
        .env_remove("UNDOLOG_SESSION");
    cmd
}

/// `undolog` acting as user 1 in session "s1".
fn as_admin(dir: &TempDir) -> Command {
    let mut cmd = undolog(dir);
    cmd.args(["--user", "1", "--session", "s1"]);
    cmd
}

/// Initialize a project with user 1 administering group 1.
fn init_with_group(dir: &TempDir) {
    undolog(dir).arg("init").assert().success();
    undolog(dir)
        .args(["user", "add", "admin@example.com"])
        .assert()
        .success();
    as_admin(dir)
        .args(["group", "add", "Acme"])
        .assert()
        .success();
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.arg("--json").output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

fn team_names(dir: &TempDir) -> Vec<String> {
    let teams = json_stdout(undolog(dir).args(["team", "list", "1"]));
    teams
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// undolog init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_config_and_store() {
    let dir = TempDir::new().unwrap();
    undolog(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created: .undolog/config.yaml"));

    assert!(dir.path().join(".undolog/config.yaml").exists());
    assert!(dir.path().join(".undolog/actions.redb").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    undolog(&dir).arg("init").assert().success();
    undolog(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:  .undolog/config.yaml"));
}

#[test]
fn commands_before_init_fail() {
    let dir = TempDir::new().unwrap();
    undolog(&dir)
        .args(["team", "list", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

// ---------------------------------------------------------------------------
// undo / redo
// ---------------------------------------------------------------------------

#[test]
fn create_undo_redo_team() {
    let dir = TempDir::new().unwrap();
    init_with_group(&dir);

    as_admin(&dir)
        .args(["team", "create", "1", "sales"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created team 1: sales"));
    assert_eq!(team_names(&dir), vec!["sales"]);

    as_admin(&dir)
        .args(["undo", "--group", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Undid #1: Create team \"sales\""));
    assert!(team_names(&dir).is_empty());

    as_admin(&dir)
        .args(["redo", "--group", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Redid #1"));
    assert_eq!(team_names(&dir), vec!["sales"]);
}

#[test]
fn rename_is_undone_to_previous_name() {
    let dir = TempDir::new().unwrap();
    init_with_group(&dir);
    as_admin(&dir)
        .args(["team", "create", "1", "original", "name"])
        .assert()
        .success();
    as_admin(&dir)
        .args(["team", "rename", "1", "1", "updated", "name"])
        .assert()
        .success();
    assert_eq!(team_names(&dir), vec!["updated name"]);

    as_admin(&dir).args(["undo", "--scope", "teams:1"]).assert().success();
    assert_eq!(team_names(&dir), vec!["original name"]);
}

#[test]
fn nothing_to_undo_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    init_with_group(&dir);
    as_admin(&dir)
        .args(["undo", "--group", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to undo."));
}

#[test]
fn undo_json_reports_replay() {
    let dir = TempDir::new().unwrap();
    init_with_group(&dir);
    as_admin(&dir)
        .args(["team", "create", "1", "sales"])
        .assert()
        .success();

    let value = json_stdout(as_admin(&dir).args(["undo", "--group", "1"]));
    assert_eq!(value["op"], "undo");
    assert_eq!(value["replay"]["actions"][0]["type_key"], "create_team");
    assert_eq!(value["replay"]["actions"][0]["scope"], "teams:1");

    let value = json_stdout(as_admin(&dir).args(["undo", "--group", "1"]));
    assert!(value["replay"].is_null());
}

#[test]
fn undo_requires_session_and_scope() {
    let dir = TempDir::new().unwrap();
    init_with_group(&dir);
    undolog(&dir)
        .args(["--user", "1", "undo", "--group", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--session is required"));
    as_admin(&dir)
        .arg("undo")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one --group or --scope"));
}

#[test]
fn other_session_cannot_undo() {
    let dir = TempDir::new().unwrap();
    init_with_group(&dir);
    as_admin(&dir)
        .args(["team", "create", "1", "sales"])
        .assert()
        .success();

    undolog(&dir)
        .args(["--user", "1", "--session", "s2", "undo", "--group", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to undo."));
    assert_eq!(team_names(&dir), vec!["sales"]);
}

#[test]
fn grouped_actions_undo_together() {
    let dir = TempDir::new().unwrap();
    init_with_group(&dir);
    undolog(&dir)
        .args(["user", "add", "invitee@example.com"])
        .assert()
        .success();

    let group = "6f1c2a44-5b1e-4c3e-9d7a-0b8e4f6a2c11";
    as_admin(&dir)
        .args(["--action-group", group, "team", "create", "1", "sales"])
        .assert()
        .success();
    as_admin(&dir)
        .args(["--action-group", group, "subject", "add", "1", "1"])
        .args(["--email", "invitee@example.com"])
        .assert()
        .success();

    let value = json_stdout(as_admin(&dir).args(["undo", "--group", "1"]));
    assert_eq!(value["replay"]["actions"].as_array().unwrap().len(), 2);
    assert!(team_names(&dir).is_empty());
}

// ---------------------------------------------------------------------------
// Permissions
// ---------------------------------------------------------------------------

#[test]
fn member_cannot_create_team() {
    let dir = TempDir::new().unwrap();
    init_with_group(&dir);
    undolog(&dir)
        .args(["user", "add", "member@example.com"])
        .assert()
        .success();
    undolog(&dir)
        .args(["group", "member", "add", "1", "2"])
        .assert()
        .success();

    undolog(&dir)
        .args(["--user", "2", "--session", "s2", "team", "create", "1", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("action 'create_team' failed"))
        .stderr(predicate::str::contains("permission denied"));
    assert!(team_names(&dir).is_empty());
}

#[test]
fn demoted_admin_cannot_undo() {
    let dir = TempDir::new().unwrap();
    init_with_group(&dir);
    undolog(&dir)
        .args(["user", "add", "second@example.com"])
        .assert()
        .success();
    undolog(&dir)
        .args(["group", "member", "add", "1", "2", "--role", "admin"])
        .assert()
        .success();
    undolog(&dir)
        .args(["--user", "2", "--session", "s2", "team", "create", "1", "sales"])
        .assert()
        .success();
    undolog(&dir)
        .args(["group", "member", "add", "1", "2", "--role", "member"])
        .assert()
        .success();

    undolog(&dir)
        .args(["--user", "2", "--session", "s2", "undo", "--group", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("permission denied"));
    assert_eq!(team_names(&dir), vec!["sales"]);
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

#[test]
fn history_shows_redoable_records() {
    let dir = TempDir::new().unwrap();
    init_with_group(&dir);
    as_admin(&dir)
        .args(["team", "create", "1", "sales"])
        .assert()
        .success();
    as_admin(&dir)
        .args(["team", "create", "1", "support"])
        .assert()
        .success();
    as_admin(&dir).args(["undo", "--group", "1"]).assert().success();

    as_admin(&dir)
        .args(["history", "--group", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("undone (redoable)"))
        .stdout(predicate::str::contains("Create team \"sales\""));

    let entries = json_stdout(as_admin(&dir).args(["history", "--group", "1", "--limit", "1"]));
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["description"], "Create team \"support\"");
    assert_eq!(entries[0]["redoable"], true);
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_validate_accepts_defaults() {
    let dir = TempDir::new().unwrap();
    undolog(&dir).arg("init").assert().success();
    undolog(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

#[test]
fn config_validate_rejects_unknown_version() {
    let dir = TempDir::new().unwrap();
    undolog(&dir).arg("init").assert().success();

    let path = dir.path().join(".undolog/config.yaml");
    std::fs::write(&path, "version: 2\n").unwrap();

    undolog(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("unsupported config version 2"));
}

#[test]
fn best_effort_policy_is_reported() {
    let dir = TempDir::new().unwrap();
    undolog(&dir).arg("init").assert().success();
    let path = dir.path().join(".undolog/config.yaml");
    std::fs::write(&path, "version: 1\nundo:\n  conflict_policy: best_effort\n").unwrap();

    undolog(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[warning]"));
    undolog(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("best_effort"));
}
