//! Runs the binary against fake `cmus-remote` scripts.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const PLAYING: &str = "status playing
file /home/user/music/Song.mp3
duration 7507
position 65
tag artist Some Artist
tag album Some Album
set shuffle false
";

/// Writes an executable script that prints `stdout` when asked with `-Q`.
fn fake_remote(dir: &TempDir, stdout: &str) -> PathBuf {
    let path = dir.path().join("cmus-remote");
    let script = format!(
        "#!/bin/sh\n[ \"$1\" = \"-Q\" ] || exit 2\ncat <<'EOF'\n{}EOF\n",
        stdout
    );
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn test_once_prints_status_line() {
    let dir = TempDir::new().unwrap();
    let remote = fake_remote(&dir, PLAYING);

    cargo_bin_cmd!("cmus-status")
        .arg("--once")
        .arg("--command")
        .arg(&remote)
        .args(["--play-icon", ">"])
        .assert()
        .success()
        .stdout(">  1:05/125:07 Song.mp3 by Some Artist\n");
}

#[test]
fn test_custom_format() {
    let dir = TempDir::new().unwrap();
    let remote = fake_remote(&dir, PLAYING);

    cargo_bin_cmd!("cmus-status")
        .arg("--once")
        .arg("--command")
        .arg(&remote)
        .args(["--format", "{album} / {artist} / {year}"])
        .assert()
        .success()
        .stdout("Some Album / Some Artist / {year}\n");
}

#[test]
fn test_json_output_with_colors() {
    let dir = TempDir::new().unwrap();
    let remote = fake_remote(&dir, &PLAYING.replace("playing", "paused"));

    let assert = cargo_bin_cmd!("cmus-status")
        .arg("--once")
        .arg("--command")
        .arg(&remote)
        .args(["--colors", "--output", "json", "--interval", "10"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(value["color_hint"], "degraded");
    assert!(value["full_text"].as_str().unwrap().contains("Song.mp3"));
    assert!(value["cached_until"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_missing_player_prints_error_text() {
    cargo_bin_cmd!("cmus-status")
        .arg("--once")
        .args(["--command", "/nonexistent/cmus-remote"])
        .args(["--error-text", "cmus off"])
        .assert()
        .success()
        .stdout("cmus off\n");
}

#[test]
fn test_malformed_output_prints_error_text() {
    let dir = TempDir::new().unwrap();
    let remote = fake_remote(&dir, "tag artist Someone\n");

    cargo_bin_cmd!("cmus-status")
        .arg("--once")
        .arg("--command")
        .arg(&remote)
        .assert()
        .success()
        .stdout("error\n")
        .stderr(predicate::str::contains("no `status` line"));
}

#[test]
fn test_zero_interval_is_rejected() {
    cargo_bin_cmd!("cmus-status")
        .args(["--once", "--interval", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("poll interval"));
}

#[test]
fn test_stopped_player_without_track_logs_nothing() {
    let dir = TempDir::new().unwrap();
    let remote = fake_remote(&dir, "status stopped\nset repeat false\n");

    cargo_bin_cmd!("cmus-status")
        .arg("--once")
        .arg("--command")
        .arg(&remote)
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stdout("error\n")
        .stderr(predicate::str::is_empty());
}
