//! CLI-level tests: argument parsing and operator-facing help text.

use assert_cmd::Command;
use predicates::prelude::*;

fn bbops() -> Command {
    Command::cargo_bin("bbops").unwrap()
}

#[test]
fn help_lists_all_operational_flows() {
    bbops()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("release"))
        .stdout(predicate::str::contains("secrets"))
        .stdout(predicate::str::contains("device"))
        .stdout(predicate::str::contains("scrub"))
        .stdout(predicate::str::contains("model"));
}

#[test]
fn release_help_documents_the_bump_types() {
    bbops()
        .args(["release", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--version-type"))
        .stdout(predicate::str::contains("--no-bump"))
        .stdout(predicate::str::contains("--build-only"))
        .stdout(predicate::str::contains("--environment"))
        .stdout(predicate::str::contains("esp32s3cam"));
}

#[test]
fn release_rejects_unknown_bump_type() {
    bbops()
        .args(["release", "--version-type", "enormous"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn device_requires_a_command_argument() {
    bbops()
        .arg("device")
        .assert()
        .failure()
        .stderr(predicate::str::contains("COMMAND"));
}

#[test]
fn scrub_help_documents_dry_run() {
    bbops()
        .args(["scrub", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn model_fetch_help_documents_job_selection() {
    bbops()
        .args(["model", "fetch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--job"))
        .stdout(predicate::str::contains("--refresh"));
}

#[test]
fn release_outside_a_firmware_project_fails_with_guidance() {
    let temp = tempfile::TempDir::new().unwrap();
    bbops()
        .current_dir(temp.path())
        .args(["release", "--build-only", "--yes"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("platformio.ini"));
}

#[test]
fn secrets_aborts_when_profile_prompt_hits_eof() {
    let temp = tempfile::TempDir::new().unwrap();
    std::fs::write(temp.path().join("platformio.ini"), "[env:esp32s3cam]\n").unwrap();
    bbops()
        .current_dir(temp.path())
        .env_remove("AWS_PROFILE")
        .arg("secrets")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No AWS profile provided"));
}

#[test]
fn unknown_subcommand_is_rejected() {
    bbops().arg("frobnicate").assert().failure();
}
