//! Integration tests for init and config commands

#![allow(deprecated)]

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

mod common;
use common::{init_journal, worklog_cmd};

#[test]
fn test_init_creates_config() {
    let temp = TempDir::new().unwrap();

    worklog_cmd()
        .arg("init")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized worklog journal"));

    assert!(temp.path().join(".worklog").is_dir());
    let content = fs::read_to_string(temp.path().join(".worklog/config.toml")).unwrap();
    assert!(content.contains("sheet_name = \"DailyWork\""));
    assert!(content.contains("file_name = \"DailyWorkTracker.csv\""));
}

#[test]
fn test_init_already_initialized_fails() {
    let temp = TempDir::new().unwrap();

    init_journal(temp.path());
    worklog_cmd().arg("init").arg(temp.path()).assert().failure();
}

#[test]
fn test_commands_outside_journal_exit_2() {
    let temp = TempDir::new().unwrap();

    worklog_cmd()
        .current_dir(temp.path())
        .arg("list")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("worklog init"));
}

#[test]
fn test_worklog_root_env_selects_journal() {
    let journal = TempDir::new().unwrap();
    let elsewhere = TempDir::new().unwrap();
    init_journal(journal.path());

    worklog_cmd()
        .current_dir(elsewhere.path())
        .env("WORKLOG_ROOT", journal.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 entries"));
}

#[test]
fn test_config_set_and_get() {
    let temp = TempDir::new().unwrap();
    init_journal(temp.path());

    worklog_cmd()
        .current_dir(temp.path())
        .args(["config", "cloud.file_name", "Work.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set cloud.file_name = Work.csv"));

    worklog_cmd()
        .current_dir(temp.path())
        .args(["config", "cloud.file_name"])
        .assert()
        .success()
        .stdout("Work.csv\n");
}

#[test]
fn test_config_list() {
    let temp = TempDir::new().unwrap();
    init_journal(temp.path());

    worklog_cmd()
        .current_dir(temp.path())
        .args(["config", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("storage.quota_bytes = 5242880"))
        .stdout(predicate::str::contains("spreadsheet.persistent_handles = true"))
        .stdout(predicate::str::contains("created = "));
}

#[test]
fn test_config_rejects_unknown_and_read_only_keys() {
    let temp = TempDir::new().unwrap();
    init_journal(temp.path());

    worklog_cmd()
        .current_dir(temp.path())
        .args(["config", "mode", "daily"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));

    worklog_cmd()
        .current_dir(temp.path())
        .args(["config", "created", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("read-only"));
}
