//! End-to-end tests for the drupkeep CLI
//!
//! These tests verify:
//! - Help/version output
//! - Exit codes for verify and patch against fixture projects
//! - JSON output schema from the CLI boundary
//!
//! Audit runs that need the network are not exercised here; the audit
//! workflow is covered by unit tests with a fake registry.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn drupkeep() -> Command {
    Command::cargo_bin("drupkeep").expect("binary builds")
}

fn create_project(composer_json: &str, composer_lock: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    fs::write(dir.path().join("composer.json"), composer_json).unwrap();
    fs::write(dir.path().join("composer.lock"), composer_lock).unwrap();
    dir
}

fn consistent_project() -> TempDir {
    create_project(
        r#"{
            "name": "example/site",
            "require": {"drupal/core": "^10.2", "php": ">=8.1"},
            "require-dev": {"phpunit/phpunit": "^9.6"}
        }"#,
        r#"{
            "packages": [{"name": "drupal/core", "version": "10.2.3"}],
            "packages-dev": [{"name": "phpunit/phpunit", "version": "9.6.15"}]
        }"#,
    )
}

#[test]
fn test_help_lists_subcommands() {
    drupkeep()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("audit"))
        .stdout(predicate::str::contains("verify"))
        .stdout(predicate::str::contains("compat"))
        .stdout(predicate::str::contains("patch"));
}

#[test]
fn test_version_output() {
    drupkeep()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("drupkeep"));
}

#[test]
fn test_missing_subcommand_fails() {
    drupkeep().assert().failure();
}

#[test]
fn test_verify_consistent_project_exits_zero() {
    let dir = consistent_project();
    drupkeep()
        .args(["verify", "--project"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 satisfied, 0 mismatched, 0 missing"));
}

#[test]
fn test_verify_mismatch_exits_two() {
    let dir = create_project(
        r#"{"require": {"drupal/core": "^10.2"}}"#,
        r#"{"packages": [{"name": "drupal/core", "version": "9.5.11"}]}"#,
    );
    drupkeep()
        .args(["verify", "--project"])
        .arg(dir.path())
        .assert()
        .code(2)
        .stdout(predicate::str::contains("mismatch"));
}

#[test]
fn test_verify_missing_project_exits_one() {
    drupkeep()
        .args(["verify", "--project", "/nonexistent/project/path"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_verify_json_output() {
    let dir = consistent_project();
    let output = drupkeep()
        .args(["verify", "--json", "--project"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["summary"]["satisfied"], 2);
    assert_eq!(parsed["summary"]["mismatched"], 0);
}

#[test]
fn test_patch_list_empty() {
    let dir = consistent_project();
    drupkeep()
        .args(["patch", "list", "--project"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No patches registered"));
}

#[test]
fn test_patch_add_and_list_roundtrip() {
    let dir = consistent_project();
    fs::create_dir(dir.path().join("patches")).unwrap();
    fs::write(dir.path().join("patches/core.patch"), "--- a\n+++ b\n").unwrap();

    drupkeep()
        .args([
            "patch",
            "add",
            "drupal/core",
            "Backport fix",
            "patches/core.patch",
            "--project",
        ])
        .arg(dir.path())
        .assert()
        .success();

    drupkeep()
        .args(["patch", "list", "--project"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("drupal/core"))
        .stdout(predicate::str::contains("patches/core.patch"));

    // The mutation left a backup of the previous manifest behind
    assert!(dir.path().join("composer.json.bak").exists());
}

#[test]
fn test_patch_add_missing_file_fails() {
    let dir = consistent_project();
    drupkeep()
        .args([
            "patch",
            "add",
            "drupal/core",
            "Backport fix",
            "patches/none.patch",
            "--project",
        ])
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("patch file not found"));
}

#[test]
fn test_patch_remove_unregistered_fails() {
    let dir = consistent_project();
    drupkeep()
        .args(["patch", "remove", "drupal/core", "--project"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no patch registered"));
}

#[test]
fn test_compat_missing_core_fails() {
    let dir = create_project(
        r#"{"require": {"vendor/lib": "^1.0"}}"#,
        r#"{"packages": [{"name": "vendor/lib", "version": "1.0.0"}]}"#,
    );
    drupkeep()
        .args(["compat", "--project"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("drupal/core"));
}

#[test]
fn test_audit_unknown_flag_fails() {
    drupkeep()
        .args(["audit", "--no-such-flag"])
        .assert()
        .failure();
}
