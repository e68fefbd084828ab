//! CLI tests for the `grant-access` binary.
//!
//! Only paths that never spawn `icacls` are exercised here (early failures and
//! `--dry-run`), so these run on any platform.

use std::fs;
use std::process::{Command, Output};

use serde_json::Value;
use winadmin::exit_codes;
use winadmin::test_support::TestTree;

fn grant_access(cwd: &std::path::Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_grant-access"))
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("run grant-access")
}

#[test]
fn nonexistent_path_fails_early() {
    let temp = tempfile::tempdir().expect("tempdir");
    let out = grant_access(temp.path(), &["--account", "Administrators", "no-such-dir"]);
    assert_eq!(out.status.code(), Some(exit_codes::INVALID));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("path does not exist"), "stderr: {stderr}");
    assert!(out.stdout.is_empty());
}

#[test]
fn missing_account_fails_early() {
    let tree = TestTree::new(&["a.txt"]).expect("tree");
    let root = tree.root().to_string_lossy().into_owned();
    let out = grant_access(tree.root(), &[root.as_str()]);
    assert_eq!(out.status.code(), Some(exit_codes::INVALID));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("no target account"), "stderr: {stderr}");
}

#[test]
fn missing_path_argument_is_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");
    let out = grant_access(temp.path(), &["--account", "Administrators"]);
    assert_eq!(out.status.code(), Some(exit_codes::INVALID));
}

#[test]
fn dry_run_json_reports_every_entry() {
    let tree = TestTree::new(&["docs/readme.txt"]).expect("tree");
    let root = tree.root().to_string_lossy().into_owned();
    let out = grant_access(
        tree.root(),
        &["--account", "CORP\\alice", "--dry-run", "--json", root.as_str()],
    );
    assert_eq!(out.status.code(), Some(exit_codes::OK));

    let report: Value = serde_json::from_slice(&out.stdout).expect("json report");
    assert_eq!(report["account"], "CORP\\alice");
    assert_eq!(report["unreadable"], 0);
    let entries = report["entries"].as_array().expect("entries");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["kind"], "directory");
    assert_eq!(entries[2]["kind"], "file");
    for entry in entries {
        assert_eq!(entry["owner"]["status"], "succeeded");
        assert_eq!(entry["grant"]["status"], "succeeded");
    }

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stderr.matches("would run: icacls").count(), 6);
}

#[test]
fn account_can_come_from_config() {
    let tree = TestTree::new(&["a.txt"]).expect("tree");
    fs::write(
        tree.root().join("winadmin.toml"),
        "[grant]\naccount = 'Administrators'\n",
    )
    .expect("write config");
    let root = tree.root().to_string_lossy().into_owned();
    let out = grant_access(tree.root(), &["--dry-run", root.as_str()]);
    assert_eq!(out.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&out.stdout);
    // root, a.txt and the config file itself
    assert!(
        stdout.contains("processed 3 entries for Administrators: 0 failed, 0 unreadable"),
        "stdout: {stdout}"
    );
    assert!(stdout.contains("/setowner Administrators"));
}

#[test]
fn explicit_missing_config_is_invalid() {
    let tree = TestTree::new(&["a.txt"]).expect("tree");
    let root = tree.root().to_string_lossy().into_owned();
    let out = grant_access(
        tree.root(),
        &["--config", "typo.toml", "--account", "alice", "--dry-run", root.as_str()],
    );
    assert_eq!(out.status.code(), Some(exit_codes::INVALID));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("config file not found"), "stderr: {stderr}");
    assert!(out.stdout.is_empty());
}
