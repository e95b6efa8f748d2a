//! Tests for the castplay binary

use assert_cmd::Command;
use predicates::prelude::*;

use crate::helpers::{fixtures_dir, temp_fixture};

fn castplay() -> Command {
    let mut cmd = Command::cargo_bin("castplay").expect("binary should build");
    cmd.env("NO_COLOR", "1");
    cmd
}

// ============================================================================
// Help Output
// ============================================================================

#[test]
fn play_help_lists_controls() {
    castplay()
        .args(["play", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PLAYER CONTROLS"))
        .stdout(predicate::str::contains("Pause/resume"))
        .stdout(predicate::str::contains("--speed"));
}

#[test]
fn play_without_file_is_usage_error() {
    castplay()
        .arg("play")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<FILE>"));
}

// ============================================================================
// Info
// ============================================================================

#[test]
fn info_describes_stream_recording() {
    castplay()
        .args(["info"])
        .arg(fixtures_dir().join("with_markers.cast"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Format:   v3"))
        .stdout(predicate::str::contains("Size:     30x5"))
        .stdout(predicate::str::contains("Frames:   3"))
        .stdout(predicate::str::contains("00:01 compile"));
}

#[test]
fn info_describes_format_one() {
    let (_dir, path) = temp_fixture("v1.json");
    castplay()
        .arg("info")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Title:    Century"))
        .stdout(predicate::str::contains("Duration: 01:40"));
}

#[test]
fn info_rejects_unsupported_version() {
    castplay()
        .arg("info")
        .arg(fixtures_dir().join("unsupported.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported recording version: 5"));
}

#[test]
fn play_missing_file_fails_before_touching_terminal() {
    castplay()
        .args(["play", "/nonexistent/demo.cast"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

// ============================================================================
// Completions
// ============================================================================

#[test]
fn completions_for_bash() {
    castplay()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("castplay"));
}
