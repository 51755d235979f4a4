#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn attendant(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("attendant").unwrap();
    cmd.current_dir(dir.path())
        .env("ATTENDANT_ROOT", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn init_project(dir: &TempDir) {
    attendant(dir).arg("init").assert().success();
}

fn reconcile_json(dir: &TempDir, event: &str, names: &str) -> serde_json::Value {
    let output = attendant(dir)
        .args(["--json", "reconcile", "--event", event])
        .write_stdin(names)
        .output()
        .unwrap();
    assert!(output.status.success(), "reconcile failed: {output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

fn list_json(dir: &TempDir, event: &str, all: bool) -> Vec<serde_json::Value> {
    let mut cmd = attendant(dir);
    cmd.args(["--json", "position", "list", "--event", event]);
    if all {
        cmd.arg("--all");
    }
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    value.as_array().unwrap().clone()
}

// ---------------------------------------------------------------------------
// attendant init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_directory_tree() {
    let dir = TempDir::new().unwrap();
    attendant(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created: .attendant/config.yaml"));

    assert!(dir.path().join(".attendant").is_dir());
    assert!(dir.path().join(".attendant/events").is_dir());
    assert!(dir.path().join(".attendant/config.yaml").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    attendant(&dir).arg("init").assert().success();
    attendant(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:  .attendant/config.yaml"));
}

// ---------------------------------------------------------------------------
// attendant reconcile
// ---------------------------------------------------------------------------

#[test]
fn reconcile_from_stdin_creates_positions() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    attendant(&dir)
        .args(["reconcile", "--event", "convention-2026"])
        .write_stdin("Station 1\n\nStation 2\nParking\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "3 created, 0 reactivated, 0 already active, 0 failed",
        ));

    let positions = list_json(&dir, "convention-2026", false);
    assert_eq!(positions.len(), 3);
    assert_eq!(positions[2]["name"], "Parking");
    assert_eq!(positions[2]["positionNumber"], 3);
}

#[test]
fn reconcile_twice_reuses_everything() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    reconcile_json(&dir, "ev1", "Gate A\nGate B\n");
    let summary = reconcile_json(&dir, "ev1", "gate a\nGATE B\n");

    assert_eq!(summary["reusedCount"], 2);
    assert_eq!(summary["createdCount"], 0);
    assert_eq!(list_json(&dir, "ev1", true).len(), 2);
}

#[test]
fn reconcile_reads_names_from_file_with_area() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let file = dir.path().join("names.txt");
    std::fs::write(&file, "Station 4\nStation 7\n").unwrap();

    attendant(&dir)
        .args(["reconcile", "--event", "ev1", "--area", "East Wing", "--file"])
        .arg(&file)
        .assert()
        .success();

    let positions = list_json(&dir, "ev1", false);
    assert_eq!(positions.len(), 2);
    assert_eq!(positions[0]["positionNumber"], 4);
    assert_eq!(positions[1]["positionNumber"], 7);
    assert_eq!(positions[0]["area"], "East Wing");
}

#[test]
fn reconcile_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let output = attendant(&dir)
        .args(["--json", "reconcile", "--event", "ev1", "--dry-run"])
        .write_stdin("Station 3\nLobby\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let decisions: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(decisions[0]["action"], "create");
    assert_eq!(decisions[0]["positionNumber"], 3);
    assert_eq!(decisions[0]["numbering"], "requested");
    assert_eq!(decisions[1]["positionNumber"], 2);
    assert_eq!(decisions[1]["numbering"], "fallback");

    assert!(list_json(&dir, "ev1", true).is_empty());
}

#[test]
fn reconcile_blank_input_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    attendant(&dir)
        .args(["reconcile", "--event", "ev1"])
        .write_stdin("\n   \n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn reconcile_rejects_bad_event_id() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    attendant(&dir)
        .args(["reconcile", "--event", "../escape"])
        .write_stdin("Station 1\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("escape"));
}

// ---------------------------------------------------------------------------
// attendant position
// ---------------------------------------------------------------------------

#[test]
fn position_list_empty_event() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    attendant(&dir)
        .args(["position", "list", "--event", "ev1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No positions."));
}

#[test]
fn position_range_creates_numbered_names() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    attendant(&dir)
        .args([
            "position", "range", "--event", "ev1", "--start", "10", "--end", "12", "--prefix",
            "Usher",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usher 11"));

    let positions = list_json(&dir, "ev1", false);
    assert_eq!(positions.len(), 3);
    assert_eq!(positions[0]["name"], "Usher 10");
    assert_eq!(positions[0]["sequence"], 10);
}

#[test]
fn position_range_conflict_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    reconcile_json(&dir, "ev1", "Station 2\n");

    attendant(&dir)
        .args(["position", "range", "--event", "ev1", "--start", "1", "--end", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("2"));

    assert_eq!(list_json(&dir, "ev1", true).len(), 1);
}

#[test]
fn position_range_too_large_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    attendant(&dir)
        .args(["position", "range", "--event", "ev1", "--start", "1", "--end", "150"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("100"));
}

// ---------------------------------------------------------------------------
// attendant config
// ---------------------------------------------------------------------------

#[test]
fn config_validate_default_is_clean() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    attendant(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No warnings"));
}

#[test]
fn config_validate_reports_bad_http_store() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    std::fs::write(
        dir.path().join(".attendant/config.yaml"),
        "version: 1\nstore:\n  type: http\n  base_url: scheduler.local\n",
    )
    .unwrap();

    attendant(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error]"));
}

#[test]
fn config_show_json() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let output = attendant(&dir)
        .args(["--json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["store"]["type"], "file");
    assert!(config["reconcile"]["default_area"].is_null());
}

#[test]
fn config_show_without_init_fails() {
    let dir = TempDir::new().unwrap();

    attendant(&dir)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn configured_default_area_applies_to_reconcile() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    std::fs::write(
        dir.path().join(".attendant/config.yaml"),
        "version: 1\nreconcile:\n  default_area: Main Hall\n",
    )
    .unwrap();

    reconcile_json(&dir, "ev1", "Station 1\n");
    let positions = list_json(&dir, "ev1", false);
    assert_eq!(positions[0]["area"], "Main Hall");
}

#[test]
fn blank_area_flag_falls_back_to_configured_default() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    std::fs::write(
        dir.path().join(".attendant/config.yaml"),
        "version: 1\nreconcile:\n  default_area: Main Hall\n",
    )
    .unwrap();

    attendant(&dir)
        .args(["reconcile", "--event", "ev1", "--area", "  "])
        .write_stdin("Door\n")
        .assert()
        .success();
    attendant(&dir)
        .args(["reconcile", "--event", "ev1", "--area", "Foyer"])
        .write_stdin("Gate\n")
        .assert()
        .success();

    let positions = list_json(&dir, "ev1", false);
    assert_eq!(positions[0]["area"], "Main Hall");
    assert_eq!(positions[1]["area"], "Foyer");
}
