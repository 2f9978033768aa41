//! Integration tests for cloud sign-in and CSV sync against a loopback stub

#![allow(deprecated)]

use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

mod common;
use common::{init_journal, seed_entries, worklog_cmd, StubServer, TWO_ENTRIES};

const TOKEN: &str = "test-token";

fn signed_in_journal(temp: &TempDir, base_url: &str) {
    init_journal(temp.path());
    seed_entries(temp.path(), TWO_ENTRIES);
    worklog_cmd()
        .current_dir(temp.path())
        .args(["config", "cloud.base_url", base_url])
        .assert()
        .success();
    worklog_cmd()
        .current_dir(temp.path())
        .env("WORKLOG_ACCESS_TOKEN", TOKEN)
        .args(["cloud", "signin", "--account", "me@example.com"])
        .assert()
        .success()
        .stdout("Signed in as me@example.com\n");
}

fn sync(root: &Path) -> assert_cmd::assert::Assert {
    worklog_cmd()
        .current_dir(root)
        .env("WORKLOG_ACCESS_TOKEN", TOKEN)
        .args(["cloud", "sync"])
        .assert()
}

#[test]
fn test_status_and_signout() {
    let temp = TempDir::new().unwrap();
    init_journal(temp.path());

    worklog_cmd()
        .current_dir(temp.path())
        .args(["cloud", "status"])
        .assert()
        .success()
        .stdout("Not signed in.\n");

    signed_in_journal(&temp, "http://127.0.0.1:9/drive/root");
    worklog_cmd()
        .current_dir(temp.path())
        .args(["cloud", "status"])
        .assert()
        .success()
        .stdout("Signed in as me@example.com\n");

    worklog_cmd()
        .current_dir(temp.path())
        .args(["cloud", "signout"])
        .assert()
        .success();
    worklog_cmd()
        .current_dir(temp.path())
        .args(["cloud", "status"])
        .assert()
        .success()
        .stdout("Not signed in.\n");
}

#[test]
fn test_signin_without_token_or_terminal_fails() {
    let temp = TempDir::new().unwrap();
    init_journal(temp.path());

    worklog_cmd()
        .current_dir(temp.path())
        .args(["cloud", "signin", "--account", "me@example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("WORKLOG_ACCESS_TOKEN"));

    worklog_cmd()
        .current_dir(temp.path())
        .args(["cloud", "status"])
        .assert()
        .stdout("Not signed in.\n");
}

#[test]
fn test_sync_requires_sign_in() {
    let temp = TempDir::new().unwrap();
    init_journal(temp.path());

    sync(temp.path())
        .failure()
        .stderr(predicate::str::contains("Not signed in."));
}

#[test]
fn test_sync_creates_missing_file_then_uploads() {
    let server = StubServer::start(vec![(404, "not found"), (201, "{}"), (200, "{}")]);
    let temp = TempDir::new().unwrap();
    signed_in_journal(&temp, &server.base_url);

    sync(temp.path())
        .success()
        .stdout(predicate::str::starts_with(
            "Synced to OneDrive: DailyWorkTracker.csv at ",
        ));

    let requests = server.requests();
    assert_eq!(requests.len(), 3);

    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/drive/root/children/DailyWorkTracker.csv");
    assert_eq!(
        requests[0].header("authorization"),
        Some("Bearer test-token")
    );

    assert_eq!(requests[1].method, "PUT");
    assert_eq!(
        requests[1].path,
        "/drive/root/children/DailyWorkTracker.csv/content"
    );
    assert_eq!(requests[1].body, "dateISO,day,notes,lastUpdated,id\n");
    assert_eq!(requests[1].header("content-type"), Some("text/csv"));

    assert_eq!(requests[2].method, "PUT");
    assert_eq!(
        requests[2].body,
        "dateISO,day,notes,lastUpdated,id\n\
         2024-01-01,Monday,meeting,1704103200000,e_1\n\
         2024-01-03,Wednesday,fixed bug,1704276000000,e_2"
    );
}

#[test]
fn test_sync_existing_file_uploads_once() {
    let server = StubServer::start(vec![(200, "{}"), (200, "{}")]);
    let temp = TempDir::new().unwrap();
    signed_in_journal(&temp, &server.base_url);

    sync(temp.path()).success();

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[1].method, "PUT");
    assert!(requests[1].body.contains("fixed bug"));
}

#[test]
fn test_sync_quotes_csv_fields() {
    let server = StubServer::start(vec![(200, "{}"), (200, "{}")]);
    let temp = TempDir::new().unwrap();
    signed_in_journal(&temp, &server.base_url);
    seed_entries(
        temp.path(),
        r#"[{"id":"e_9","dateISO":"2024-01-02","day":"Tuesday","notes":"said \"hi\", left\nearly","lastUpdated":5}]"#,
    );

    sync(temp.path()).success();

    let body = &server.requests()[1].body;
    assert!(body.ends_with("2024-01-02,Tuesday,\"said \"\"hi\"\", left\nearly\",5,e_9"));
}

#[test]
fn test_sync_failure_reports_sync_failed() {
    let server = StubServer::start(vec![(500, "drive exploded")]);
    let temp = TempDir::new().unwrap();
    signed_in_journal(&temp, &server.base_url);

    sync(temp.path())
        .failure()
        .stderr(predicate::str::contains("Sync failed."))
        .stderr(predicate::str::contains("drive exploded"));

    assert_eq!(server.requests().len(), 1);
}

#[test]
fn test_custom_file_name_is_encoded() {
    let server = StubServer::start(vec![(200, "{}"), (200, "{}")]);
    let temp = TempDir::new().unwrap();
    signed_in_journal(&temp, &server.base_url);
    worklog_cmd()
        .current_dir(temp.path())
        .args(["config", "cloud.file_name", "My Work.csv"])
        .assert()
        .success();

    sync(temp.path())
        .success()
        .stdout(predicate::str::contains("Synced to OneDrive: My Work.csv"));

    assert_eq!(
        server.requests()[0].path,
        "/drive/root/children/My%20Work.csv"
    );
}
