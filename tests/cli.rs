//
//  bbdc-cli
//  tests/cli.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! End-to-end tests of the binary surface: argument parsing, configuration
//! failures and exit codes. Network-facing behavior is covered by the
//! mockito tests inside the crate.

use assert_cmd::Command;
use predicates::prelude::*;

fn bbdc() -> Command {
    let mut cmd = Command::cargo_bin("bbdc").expect("binary builds");
    cmd.env_remove("BITBUCKET_SERVER")
        .env_remove("BITBUCKET_API_TOKEN")
        .env_remove("BBDC_PROJECT")
        .env_remove("BBDC_REPO")
        .env_remove("BBDC_DEBUG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    bbdc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pull request"))
        .stdout(predicate::str::contains("doctor"));
}

#[test]
fn test_version_subcommand() {
    bbdc()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bbdc version"));
}

#[test]
fn test_missing_environment_fails_with_config_exit_code() {
    bbdc()
        .args(["pr", "list", "-p", "PRJ", "-r", "widget"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("BITBUCKET_SERVER"));
}

#[test]
fn test_server_without_rest_suffix_is_rejected() {
    bbdc()
        .args(["pr", "list", "-p", "PRJ", "-r", "widget"])
        .env("BITBUCKET_SERVER", "https://bitbucket.example.com/bitbucket")
        .env("BITBUCKET_API_TOKEN", "token")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("/rest"));
}

#[test]
fn test_missing_project_is_a_usage_error_before_any_request() {
    bbdc()
        .args(["pr", "list"])
        .env("BITBUCKET_SERVER", "https://bitbucket.example.com/rest")
        .env("BITBUCKET_API_TOKEN", "token")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No project specified"));
}

#[test]
fn test_pr_without_subcommand_shows_usage() {
    bbdc().arg("pr").assert().failure().code(2);
}

#[test]
fn test_completion_bash_prints_script() {
    bbdc()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bbdc"));
}
