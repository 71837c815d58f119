mod cli;
mod config;
mod initialize;
mod player;
mod status;
mod types;

use std::io::{self, Write};
use std::thread;
use std::time::SystemTime;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use cli::{Cli, OutputFormat};
use player::cmus::Cmus;
use player::Player;
use status::RenderOutput;

/// One line of `--output json`.
#[derive(Debug, Serialize)]
struct JsonLine<'a> {
    full_text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    color_hint: Option<&'static str>,
    cached_until: f64,
}

impl<'a> From<&'a RenderOutput> for JsonLine<'a> {
    fn from(output: &'a RenderOutput) -> Self {
        Self {
            full_text: &output.text,
            color_hint: output.color_hint.map(|hint| hint.as_str()),
            cached_until: output.valid_until_epoch_seconds(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = initialize::initialize(&cli.log_level)?;

    let config = cli.config().validate()?;
    let mut cmus = Cmus::new(&config)?;
    log::info!("polling {} every {:?}", config.query_command, config.poll_interval);

    let stdout = io::stdout();
    loop {
        let output = status::render(&config, &cmus.attributes());
        {
            let mut out = stdout.lock();
            print_line(&mut out, &output, cli.output)?;
            out.flush().context("failed to flush stdout")?;
        }

        if cli.once {
            return Ok(());
        }

        // The query itself may have eaten into the interval.
        let wait = output
            .valid_until
            .duration_since(SystemTime::now())
            .unwrap_or_default();
        thread::sleep(wait);
    }
}

fn print_line(out: &mut impl Write, output: &RenderOutput, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Plain => writeln!(out, "{}", output.text)?,
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, &JsonLine::from(output))?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
fn printed(output: &RenderOutput, format: OutputFormat) -> String {
    let mut buffer = Vec::new();
    print_line(&mut buffer, output, format).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[test]
fn test_print_plain_line() {
    let output = RenderOutput {
        text: "> 1:05/4:05 Song by Band".to_string(),
        color_hint: Some(status::ColorHint::Good),
        valid_until: SystemTime::UNIX_EPOCH,
    };
    assert_eq!(printed(&output, OutputFormat::Plain), "> 1:05/4:05 Song by Band\n");
}

#[test]
fn test_print_json_line() {
    let output = RenderOutput {
        text: "Song \"live\"".to_string(),
        color_hint: Some(status::ColorHint::Degraded),
        valid_until: SystemTime::UNIX_EPOCH + std::time::Duration::from_millis(1_500),
    };
    let line = printed(&output, OutputFormat::Json);
    assert!(line.ends_with('\n'));
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["full_text"], "Song \"live\"");
    assert_eq!(value["color_hint"], "degraded");
    assert_eq!(value["cached_until"], 1.5);
}

#[test]
fn test_print_json_line_without_hint() {
    let output = RenderOutput {
        text: "error".to_string(),
        color_hint: None,
        valid_until: SystemTime::UNIX_EPOCH,
    };
    let value: serde_json::Value =
        serde_json::from_str(&printed(&output, OutputFormat::Json)).unwrap();
    assert!(value.get("color_hint").is_none());
}
