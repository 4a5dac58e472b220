//! CLI end-to-end tests
//!
//! Drive the pictura binary against a throwaway database file.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

const OWNER: &str = "6f1c2a4e-8d3b-4f5a-9c7e-1b2d3e4f5a6b";

/// Get a command for the pictura binary
#[allow(deprecated)]
fn pictura_cmd() -> Command {
    Command::cargo_bin("pictura").unwrap()
}

/// A command pointed at `db`, isolated from any config in the working dir.
fn pictura_with_db(dir: &Path, db: &Path) -> Command {
    let mut cmd = pictura_cmd();
    cmd.current_dir(dir).arg("--db").arg(db);
    cmd
}

fn scratch_db() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let db = dir.path().join("pictura.db");
    (dir, db)
}

fn add(dir: &Path, db: &Path, name: &str, kind: &str, owner: &str) -> serde_json::Value {
    let output = pictura_with_db(dir, db)
        .args(["add", "--name", name, "--imageable-type", kind, "--imageable-id", owner])
        .output()
        .unwrap();
    assert!(output.status.success(), "add failed: {:?}", output);
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = pictura_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = pictura_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pictura"));
}

#[test]
fn test_cli_migrate_reports_latest_version() {
    let (dir, db) = scratch_db();
    pictura_with_db(dir.path(), &db)
        .arg("migrate")
        .assert()
        .success()
        .stdout(predicate::str::contains("schema version 2 (latest 2)"));
    assert!(db.exists());
}

#[test]
fn test_cli_add_creates_public_file_asset() {
    let (dir, db) = scratch_db();
    let created = add(dir.path(), &db, "cover.jpg", "Product", OWNER);

    assert_eq!(created["picture"]["name"], "cover.jpg");
    assert_eq!(created["picture"]["imageable"]["type"], "Product");
    assert_eq!(created["picture"]["imageable"]["id"], OWNER);
    assert_eq!(created["file_asset"]["filename"], "cover.jpg");
    assert_eq!(created["file_asset"]["permission"], "public");
    assert_eq!(
        created["picture"]["file_asset_id"],
        created["file_asset"]["id"]
    );
}

#[test]
fn test_cli_add_rejects_unknown_owner_type() {
    let (dir, db) = scratch_db();
    pictura_with_db(dir.path(), &db)
        .args(["add", "--name", "x.png", "--imageable-type", "Shop", "--imageable-id", OWNER])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown imageable type 'Shop'"));
}

#[test]
fn test_cli_show_rename_and_list() {
    let (dir, db) = scratch_db();
    let created = add(dir.path(), &db, "draft.png", "User", OWNER);
    let id = created["picture"]["id"].as_str().unwrap().to_string();

    pictura_with_db(dir.path(), &db)
        .args(["rename", &id, "final.png"])
        .assert()
        .success();

    let output = pictura_with_db(dir.path(), &db)
        .args(["show", &id])
        .output()
        .unwrap();
    assert!(output.status.success());
    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["picture"]["name"], "final.png");
    assert_eq!(shown["file_asset"]["filename"], "draft.png");

    let output = pictura_with_db(dir.path(), &db)
        .args(["list", "--imageable-type", "User", "--imageable-id", OWNER])
        .output()
        .unwrap();
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], id.as_str());

    let output = pictura_with_db(dir.path(), &db)
        .args(["list", "--imageable-type", "Article", "--imageable-id", OWNER])
        .output()
        .unwrap();
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(listed.as_array().unwrap().is_empty());
}

#[test]
fn test_cli_delete_keeps_file_asset() {
    let (dir, db) = scratch_db();
    let created = add(dir.path(), &db, "old.png", "Article", OWNER);
    let id = created["picture"]["id"].as_str().unwrap().to_string();
    let asset = created["file_asset"]["id"].as_str().unwrap().to_string();

    pictura_with_db(dir.path(), &db)
        .args(["delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "file asset {asset} was left in place"
        )));

    pictura_with_db(dir.path(), &db)
        .args(["show", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("picture not found"));
}

#[test]
fn test_cli_show_rejects_malformed_id() {
    let (dir, db) = scratch_db();
    pictura_with_db(dir.path(), &db)
        .args(["show", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_cli_validate_with_config_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("pictura.toml");
    std::fs::write(
        &config_path,
        "[database]\npath = \"\"\npool_size = 0\n",
    )
    .unwrap();

    let mut cmd = pictura_cmd();
    cmd.current_dir(dir.path())
        .args(["--config"])
        .arg(&config_path)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("pool_size"))
        .stdout(predicate::str::contains("path is empty"));
}

#[test]
fn test_cli_zero_pool_size_fails_cleanly() {
    let (dir, db) = scratch_db();
    std::fs::write(dir.path().join("pictura.toml"), "[database]\npool_size = 0\n").unwrap();

    pictura_with_db(dir.path(), &db)
        .arg("migrate")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("pool_size must be at least 1"))
        .stderr(predicate::str::contains("panicked").not());
    assert!(!db.exists());
}

#[test]
fn test_cli_picks_up_config_in_working_dir() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("from-config.db");
    std::fs::write(
        dir.path().join("pictura.toml"),
        format!("[database]\npath = {:?}\n", db.to_string_lossy()),
    )
    .unwrap();

    let mut cmd = pictura_cmd();
    cmd.current_dir(dir.path()).arg("migrate").assert().success();
    assert!(db.exists());
}

#[test]
fn test_cli_invalid_config_fails() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("broken.toml");
    std::fs::write(&config_path, "[database\n").unwrap();

    let mut cmd = pictura_cmd();
    cmd.current_dir(dir.path())
        .arg("--config")
        .arg(&config_path)
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}
