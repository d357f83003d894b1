//! Smoke tests for the sitecheck CLI
//!
//! None of these launch a browser: they cover argument handling, scenario
//! listing and config output.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the sitecheck binary
fn sitecheck() -> Command {
    let mut cmd = Command::cargo_bin("sitecheck").expect("sitecheck binary should exist");
    cmd.env_remove("SITECHECK_BASE_URL")
        .env_remove("SITECHECK_LOGIN_USER")
        .env_remove("SITECHECK_LOGIN_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

const SMOKE_YAML: &str = "\
scenarios:
  - name: Landing hero
    url: https://staging.encer.store/
    tags: [home]
    steps:
      - action: assert_visible
        locator:
          selector:
            css: h2
  - name: About heading
    url: https://staging.encer.store/about/
    steps:
      - action: assert_text
        locator:
          selector:
            css: h1
        matcher:
          contains: About
";

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    sitecheck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.4.0"));
}

#[test]
fn test_help_flag() {
    sitecheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("storefront"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_no_args_shows_help() {
    sitecheck().assert().failure(); // Requires a subcommand
}

#[test]
fn test_run_subcommand_help() {
    sitecheck()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--fail-fast"))
        .stdout(predicate::str::contains("--ignore-error"));
}

// ============================================================================
// List Tests
// ============================================================================

#[test]
fn test_list_builtin_scenarios() {
    sitecheck()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Homepage hero"))
        .stdout(predicate::str::contains("Footer link: Privacy Policy"))
        .stdout(predicate::str::contains("https://encer.store/"));
}

#[test]
fn test_list_with_filter() {
    sitecheck()
        .args(["list", "--filter", "boost"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ENCER BOOST TREATMENT side cart"))
        .stdout(predicate::str::contains("Homepage hero").not());
}

#[test]
fn test_list_with_base_url() {
    sitecheck()
        .args(["list", "--base-url", "http://localhost:8080", "-f", "About"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:8080/about/"));
}

#[test]
fn test_list_yaml_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("smoke.yaml");
    fs::write(&path, SMOKE_YAML).unwrap();

    sitecheck()
        .args(["list", "--yaml", "--scenarios"])
        .arg(&path)
        .args(["--filter", "home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name: Landing hero"))
        .stdout(predicate::str::contains("About heading").not());
}

#[test]
fn test_list_unknown_filter_fails() {
    sitecheck()
        .args(["list", "--filter", "no such scenario"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no scenarios match"));
}

#[test]
fn test_list_conflicting_duplicates_fail() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dupes.yaml");
    fs::write(
        &path,
        "scenarios:\n  - name: x\n    url: https://encer.store/\n  - name: x\n    url: https://encer.store/about/\n",
    )
    .unwrap();

    sitecheck()
        .args(["list", "--scenarios"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate scenario"));
}

// ============================================================================
// Run Tests (argument errors only)
// ============================================================================

#[test]
fn test_run_unknown_filter_fails_before_launch() {
    sitecheck()
        .args(["run", "--filter", "no such scenario"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no scenarios match"));
}

#[test]
fn test_run_missing_config_file() {
    sitecheck()
        .args(["run", "--config", "/nonexistent/sitecheck.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn test_run_rejects_invalid_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sitecheck.yaml");
    fs::write(&path, "command_timeout_ms: 0\n").unwrap();

    sitecheck()
        .args(["run", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("greater than zero"));
}

#[test]
fn test_run_rejects_unknown_format() {
    sitecheck()
        .args(["run", "--format", "tap"])
        .assert()
        .failure();
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_shows_defaults() {
    sitecheck()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("command_timeout_ms: 10000"))
        .stdout(predicate::str::contains("headless: true"));
}

#[test]
fn test_config_merges_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sitecheck.yaml");
    fs::write(&path, "fail_on_status_code: true\n").unwrap();

    sitecheck()
        .args(["config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("fail_on_status_code: true"))
        .stdout(predicate::str::contains("headless: true"));
}

#[test]
fn test_config_init_writes_file_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sitecheck.yaml");

    sitecheck().args(["config", "--init"]).arg(&path).assert().success();
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("page_load_timeout_ms"));

    sitecheck()
        .args(["config", "--init"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
