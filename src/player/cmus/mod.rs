use std::io;
use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::process::Command;
use tokio::runtime::{Builder, Runtime};

use super::parse_attributes;
use super::AttributeMap;
use super::Player;
use crate::config::Config;

const QUERY_FLAG: &str = "-Q";

pub struct Cmus {
    command: String,
    timeout: Duration,
    // Only drives the child process wait; nothing outlives a query.
    runtime: Runtime,
}

impl Player for Cmus {
    fn attributes(&mut self) -> AttributeMap {
        match self.query() {
            Ok(stdout) => {
                let attributes = parse_attributes(&stdout);
                log::debug!("{} reported {} attributes", self.command, attributes.len());
                attributes
            }
            Err(err) => {
                log::debug!("{} query failed: {:#}", self.command, err);
                AttributeMap::new()
            }
        }
    }
}

impl Cmus {
    pub fn new(config: &Config) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_io()
            .enable_time()
            .build()
            .context("failed to create the query runtime")?;
        Ok(Self {
            command: config.query_command.clone(),
            timeout: config.query_timeout,
            runtime,
        })
    }

    /// Runs the query command and returns its stdout.
    ///
    /// stderr is drained alongside stdout and dropped. The child is killed and
    /// reaped if the deadline passes before it exits.
    fn query(&self) -> Result<String> {
        let output = self
            .runtime
            .block_on(run_with_timeout(&self.command, self.timeout));
        let Output { status, stdout, .. } =
            output.with_context(|| format!("failed to run `{} {}`", self.command, QUERY_FLAG))?;

        if !status.success() {
            log::debug!("{} exited with {}", self.command, status);
        }
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

async fn run_with_timeout(command: &str, timeout: Duration) -> io::Result<Output> {
    let child = Command::new(command)
        .arg(QUERY_FLAG)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(output) => output,
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("no answer within {:?}", timeout),
        )),
    }
}

#[cfg(all(test, unix))]
fn script_player(body: &str, timeout: Duration) -> (tempfile::TempDir, Cmus) {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake-cmus-remote");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

    let config = Config {
        query_command: path.to_string_lossy().into_owned(),
        query_timeout: timeout,
        ..Config::default()
    };
    (dir, Cmus::new(&config).unwrap())
}

#[cfg(unix)]
#[test]
fn test_reads_script_output() {
    let (_dir, mut cmus) = script_player(
        "[ \"$1\" = \"-Q\" ] || exit 3\n\
         echo 'status paused'\n\
         echo 'position 12'\n\
         echo 'duration 300'\n\
         echo 'tag artist Two Words'\n\
         echo 'noise on stderr' >&2",
        Duration::from_secs(5),
    );
    let attributes = cmus.attributes();
    assert_eq!(attributes.get("status"), Some("paused"));
    assert_eq!(attributes.get("position"), Some("12"));
    assert_eq!(attributes.get("artist"), Some("Two Words"));
}

#[cfg(unix)]
#[test]
fn test_failing_command_without_output_is_empty() {
    let (_dir, mut cmus) = script_player(
        "echo 'cmus-remote: cmus is not running' >&2\nexit 1",
        Duration::from_secs(5),
    );
    assert!(cmus.attributes().is_empty());
}

#[cfg(unix)]
#[test]
fn test_slow_command_times_out() {
    let (_dir, mut cmus) = script_player("sleep 5\necho 'status playing'", Duration::from_millis(200));
    let started = std::time::Instant::now();
    assert!(cmus.attributes().is_empty());
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[test]
fn test_missing_binary_is_empty() {
    let config = Config {
        query_command: "/nonexistent/cmus-remote-for-tests".to_string(),
        ..Config::default()
    };
    let mut cmus = Cmus::new(&config).unwrap();
    assert!(cmus.attributes().is_empty());
}

#[cfg(unix)]
#[test]
fn test_failing_command_with_output_is_parsed() {
    let (_dir, mut cmus) = script_player(
        "echo 'status paused'\necho 'tag artist Someone'\nexit 1",
        Duration::from_secs(5),
    );
    let attributes = cmus.attributes();
    assert_eq!(attributes.get("status"), Some("paused"));
    assert_eq!(attributes.get("artist"), Some("Someone"));
}
