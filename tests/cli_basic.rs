//! Integration tests for basic CLI behavior.
//!
//! Only offline behavior is covered here: flags, help text, the route list,
//! and argument validation. Nothing in this file talks to NPO.

#![allow(deprecated)] // cargo_bin deprecation — replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: get a Command for the `npo-grab` binary with a clean environment.
fn npo_grab() -> Command {
    let mut cmd = Command::cargo_bin("npo-grab").expect("binary 'npo-grab' should be built");
    cmd.env_remove("PORT")
        .env_remove("TIMEOUT")
        .env_remove("REFRESH_INTERVAL");
    cmd
}

// ─── Top-level flags ─────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    npo_grab()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: npo-grab"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("routes"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--refresh-interval"));
}

#[test]
fn help_lists_environment_variables() {
    npo_grab()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("[env: PORT="))
        .stdout(predicate::str::contains("[env: TIMEOUT="))
        .stdout(predicate::str::contains("[env: REFRESH_INTERVAL="));
}

#[test]
fn version_flag_shows_semver() {
    npo_grab()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^npo-grab \d+\.\d+\.\d+\n$").unwrap());
}

#[test]
fn invalid_subcommand_fails() {
    npo_grab()
        .arg("this-is-not-a-real-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ─── Configuration validation ────────────────────────────────────────────────

#[test]
fn invalid_timeout_fails() {
    npo_grab()
        .args(["--timeout", "soonish", "routes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--timeout"));
}

#[test]
fn invalid_refresh_interval_from_env_fails() {
    npo_grab()
        .env("REFRESH_INTERVAL", "every now and then")
        .arg("routes")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--refresh-interval"));
}

#[test]
fn invalid_port_fails() {
    npo_grab()
        .args(["--port", "99999", "routes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--port"));
}

// ─── Subcommands ─────────────────────────────────────────────────────────────

#[test]
fn routes_lists_every_station() {
    let assert = npo_grab().arg("routes").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();

    assert!(stdout.contains("10 routes"));
    for station in ["nporadio1", "nporadio2", "npo3fm", "npoklassiek", "funx"] {
        assert!(stdout.contains(&format!("/{station}.m3u8")), "{station} hls");
        assert!(stdout.contains(&format!("/{station}.mpd")), "{station} dash");
    }
    assert!(stdout.contains("fairplay"));
    assert!(stdout.contains("widevine"));
}

#[test]
fn resolve_help() {
    npo_grab()
        .args(["resolve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolve stream URLs once"))
        .stdout(predicate::str::contains("[PATH]"));
}

#[test]
fn resolve_unknown_route_fails() {
    npo_grab()
        .args(["resolve", "/nporadio9.m3u8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown route: /nporadio9.m3u8"));
}
