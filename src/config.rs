use std::time::Duration;

use anyhow::{ensure, Result};

pub const DEFAULT_PLAY_ICON: char = '\u{f04b}';
pub const DEFAULT_PAUSE_ICON: char = '\u{f04c}';
pub const DEFAULT_STOP_ICON: char = '\u{f04d}';
pub const DEFAULT_TEMPLATE: &str = "{statusicon}  {time}/{duration} {name} by {artist}";
pub const DEFAULT_ERROR_TEXT: &str = "error";
pub const DEFAULT_QUERY_COMMAND: &str = "cmus-remote";

/// Settings for one status block. Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// How long a rendered line stays valid before the host should poll again.
    pub poll_interval: Duration,
    pub play_icon: char,
    pub pause_icon: char,
    pub stop_icon: char,
    pub template: String,
    /// Emit good/degraded color hints for playing/paused.
    pub use_colors: bool,
    /// Shown when the player is not running or its output can't be used.
    pub error_text: String,
    pub query_command: String,
    /// Upper bound on a single query; a slower player counts as not running.
    pub query_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            play_icon: DEFAULT_PLAY_ICON,
            pause_icon: DEFAULT_PAUSE_ICON,
            stop_icon: DEFAULT_STOP_ICON,
            template: DEFAULT_TEMPLATE.to_string(),
            use_colors: false,
            error_text: DEFAULT_ERROR_TEXT.to_string(),
            query_command: DEFAULT_QUERY_COMMAND.to_string(),
            query_timeout: Duration::from_secs(2),
        }
    }
}

impl Config {
    pub fn validate(self) -> Result<Self> {
        ensure!(
            !self.poll_interval.is_zero(),
            "poll interval must be at least one second"
        );
        ensure!(!self.query_timeout.is_zero(), "query timeout must be positive");
        ensure!(
            !self.query_command.trim().is_empty(),
            "query command cannot be empty"
        );
        Ok(self)
    }
}

#[test]
fn test_default_config_is_valid() {
    let config = Config::default().validate().unwrap();
    assert_eq!(config.poll_interval, Duration::from_secs(1));
    assert_eq!(config.play_icon, '\u{f04b}');
    assert_eq!(config.error_text, "error");
    assert!(!config.use_colors);
}

#[test]
fn test_zero_interval_is_rejected() {
    let config = Config {
        poll_interval: Duration::ZERO,
        ..Config::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("poll interval"));
}

#[test]
fn test_blank_command_is_rejected() {
    let config = Config {
        query_command: "  ".to_string(),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}
