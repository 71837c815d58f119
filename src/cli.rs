use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::{self, Config};

#[derive(Parser, Debug)]
#[command(name = "cmus-status")]
#[command(version)]
#[command(about = "Prints the state of cmus as a status bar line")]
pub struct Cli {
    /// Seconds a printed line stays valid before the next poll
    #[arg(long, env = "CMUS_STATUS_INTERVAL", default_value_t = 1)]
    pub interval: u64,

    #[arg(long, env = "CMUS_STATUS_PLAY_ICON", default_value_t = config::DEFAULT_PLAY_ICON)]
    pub play_icon: char,

    #[arg(long, env = "CMUS_STATUS_PAUSE_ICON", default_value_t = config::DEFAULT_PAUSE_ICON)]
    pub pause_icon: char,

    #[arg(long, env = "CMUS_STATUS_STOP_ICON", default_value_t = config::DEFAULT_STOP_ICON)]
    pub stop_icon: char,

    /// Line template; knows {name} {artist} {album} {time} {duration} {statusicon}
    #[arg(long, env = "CMUS_STATUS_FORMAT", default_value = config::DEFAULT_TEMPLATE)]
    pub format: String,

    /// Report good/degraded colors for playing/paused
    #[arg(long, env = "CMUS_STATUS_COLORS")]
    pub colors: bool,

    /// Text shown when cmus is not running
    #[arg(long, env = "CMUS_STATUS_ERROR_TEXT", default_value = config::DEFAULT_ERROR_TEXT)]
    pub error_text: String,

    /// Program queried with `-Q`
    #[arg(long, env = "CMUS_STATUS_COMMAND", default_value = config::DEFAULT_QUERY_COMMAND)]
    pub command: String,

    /// Milliseconds to wait for the query before giving up
    #[arg(long, env = "CMUS_STATUS_TIMEOUT", default_value_t = 2000)]
    pub timeout: u64,

    /// Print one line and exit
    #[arg(long)]
    pub once: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub output: OutputFormat,

    /// Log level written to stderr (overridden by RUST_LOG)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Just the text
    Plain,
    /// One JSON object per line
    Json,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            poll_interval: Duration::from_secs(self.interval),
            play_icon: self.play_icon,
            pause_icon: self.pause_icon,
            stop_icon: self.stop_icon,
            template: self.format.clone(),
            use_colors: self.colors,
            error_text: self.error_text.clone(),
            query_command: self.command.clone(),
            query_timeout: Duration::from_millis(self.timeout),
        }
    }
}

#[test]
fn test_defaults_match_config() {
    let cli = Cli::try_parse_from(["cmus-status"]).unwrap();
    assert_eq!(cli.config(), Config::default());
    assert_eq!(cli.output, OutputFormat::Plain);
    assert!(!cli.once);
}

#[test]
fn test_flags_override_defaults() {
    let cli = Cli::try_parse_from([
        "cmus-status",
        "--interval",
        "5",
        "--play-icon",
        ">",
        "--format",
        "{name}",
        "--colors",
        "--error-text",
        "off",
        "--timeout",
        "250",
        "--output",
        "json",
        "--once",
    ])
    .unwrap();
    let config = cli.config();
    assert_eq!(config.poll_interval, Duration::from_secs(5));
    assert_eq!(config.play_icon, '>');
    assert_eq!(config.template, "{name}");
    assert!(config.use_colors);
    assert_eq!(config.error_text, "off");
    assert_eq!(config.query_timeout, Duration::from_millis(250));
    assert_eq!(cli.output, OutputFormat::Json);
    assert!(cli.once);
}

#[test]
fn test_icons_must_be_single_characters() {
    assert!(Cli::try_parse_from(["cmus-status", "--stop-icon", "ab"]).is_err());
}
