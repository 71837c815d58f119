//! Turns one player query into the line shown in the status bar.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::config::Config;
use crate::player::AttributeMap;
use crate::types::PlayTime;

mod template;

use template::Fields;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorHint {
    Good,
    Degraded,
}

impl ColorHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorHint::Good => "good",
            ColorHint::Degraded => "degraded",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Playing,
    Paused,
    Stopped,
}

impl PlaybackStatus {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "playing" => PlaybackStatus::Playing,
            "paused" => PlaybackStatus::Paused,
            _ => PlaybackStatus::Stopped,
        }
    }

    fn icon(self, config: &Config) -> char {
        match self {
            PlaybackStatus::Playing => config.play_icon,
            PlaybackStatus::Paused => config.pause_icon,
            PlaybackStatus::Stopped => config.stop_icon,
        }
    }

    fn color_hint(self) -> Option<ColorHint> {
        match self {
            PlaybackStatus::Playing => Some(ColorHint::Good),
            PlaybackStatus::Paused => Some(ColorHint::Degraded),
            PlaybackStatus::Stopped => None,
        }
    }
}

/// Player output that can't be rendered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("player output has no `status` line")]
    MissingStatus,
    #[error("player output has no `{0}` line")]
    MissingField(&'static str),
    #[error("`{field}` is not a whole number of seconds: {value:?}")]
    InvalidSeconds { field: &'static str, value: String },
}

/// The attributes the renderer cares about, each of which may be missing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Track<'a> {
    pub status: Option<&'a str>,
    pub position: Option<&'a str>,
    pub duration: Option<&'a str>,
    pub file: Option<&'a str>,
    pub title: Option<&'a str>,
    pub artist: Option<&'a str>,
    pub album: Option<&'a str>,
}

impl<'a> Track<'a> {
    pub fn from_attributes(attributes: &'a AttributeMap) -> Self {
        Self {
            status: attributes.get("status"),
            position: attributes.get("position"),
            duration: attributes.get("duration"),
            file: attributes.get("file"),
            title: attributes.get("title"),
            artist: attributes.get("artist"),
            album: attributes.get("album"),
        }
    }

    pub fn playback_status(&self) -> Result<PlaybackStatus, RenderError> {
        self.status
            .map(PlaybackStatus::from_raw)
            .ok_or(RenderError::MissingStatus)
    }

    /// The title tag, or else the file name without its directory.
    pub fn name(&self) -> Result<&'a str, RenderError> {
        if let Some(title) = self.title {
            return Ok(title);
        }
        let file = self.file.ok_or(RenderError::MissingField("file"))?;
        Ok(match file.rfind('/') {
            Some(index) => &file[index + 1..],
            None => file,
        })
    }

    /// cmus is stopped with no track loaded, so it reports nothing to show.
    pub fn is_idle(&self) -> bool {
        self.playback_status() == Ok(PlaybackStatus::Stopped)
            && self.file.is_none()
            && self.position.is_none()
            && self.duration.is_none()
    }

    pub fn position(&self) -> Result<PlayTime, RenderError> {
        parse_seconds("position", self.position)
    }

    pub fn duration(&self) -> Result<PlayTime, RenderError> {
        parse_seconds("duration", self.duration)
    }
}

fn parse_seconds(field: &'static str, raw: Option<&str>) -> Result<PlayTime, RenderError> {
    let raw = raw.ok_or(RenderError::MissingField(field))?;
    raw.parse().map_err(|_| RenderError::InvalidSeconds {
        field,
        value: raw.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub text: String,
    pub color_hint: Option<ColorHint>,
    /// The host should not poll again before this instant.
    pub valid_until: SystemTime,
}

impl RenderOutput {
    pub fn valid_until_epoch_seconds(&self) -> f64 {
        self.valid_until
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs_f64()
    }
}

pub fn render(config: &Config, attributes: &AttributeMap) -> RenderOutput {
    render_at(config, attributes, SystemTime::now())
}

/// Renders `attributes` as of `now`.
///
/// Never fails: an empty map or unusable player output both produce the
/// configured error text without a color hint.
pub fn render_at(config: &Config, attributes: &AttributeMap, now: SystemTime) -> RenderOutput {
    let valid_until = now + config.poll_interval;
    let error_output = || RenderOutput {
        text: config.error_text.clone(),
        color_hint: None,
        valid_until,
    };

    if attributes.is_empty() {
        return error_output();
    }

    let track = Track::from_attributes(attributes);
    match render_track(config, &track) {
        Ok((text, color_hint)) => RenderOutput {
            text,
            color_hint,
            valid_until,
        },
        Err(err) if track.is_idle() => {
            log::debug!("nothing loaded in player: {}", err);
            error_output()
        }
        Err(err) => {
            log::error!("cannot render player status: {}", err);
            error_output()
        }
    }
}

fn render_track(
    config: &Config,
    track: &Track<'_>,
) -> Result<(String, Option<ColorHint>), RenderError> {
    let status = track.playback_status()?;
    let fields = Fields {
        name: track.name()?,
        artist: track.artist.unwrap_or(UNKNOWN),
        album: track.album.unwrap_or(UNKNOWN),
        time: track.position()?.to_string(),
        duration: track.duration()?.to_string(),
        status_icon: status.icon(config),
    };
    let color_hint = if config.use_colors {
        status.color_hint()
    } else {
        None
    };
    Ok((template::fill(&config.template, &fields), color_hint))
}

#[cfg(test)]
fn playing_track() -> AttributeMap {
    vec![
        ("status", "playing"),
        ("file", "/home/user/music/Song.mp3"),
        ("duration", "245"),
        ("position", "65"),
        ("title", "Real Title"),
        ("artist", "Some Artist"),
        ("album", "Some Album"),
    ]
    .into_iter()
    .collect()
}

#[cfg(test)]
fn without(mut pairs: Vec<(&'static str, &'static str)>, key: &str) -> AttributeMap {
    pairs.retain(|(k, _)| *k != key);
    pairs.into_iter().collect()
}

#[cfg(test)]
fn track_pairs(status: &'static str) -> Vec<(&'static str, &'static str)> {
    vec![
        ("status", status),
        ("file", "/home/user/music/Song.mp3"),
        ("duration", "245"),
        ("position", "65"),
    ]
}

#[cfg(test)]
fn simple_config(template: &str) -> Config {
    Config {
        play_icon: 'P',
        pause_icon: 'H',
        stop_icon: 'S',
        template: template.to_string(),
        ..Config::default()
    }
}

#[test]
fn test_render_default_template() {
    let output = render(&Config::default(), &playing_track());
    assert_eq!(output.text, "\u{f04b}  1:05/4:05 Real Title by Some Artist");
    assert_eq!(output.color_hint, None);
}

#[test]
fn test_render_empty_attributes_is_error_text() {
    let config = Config {
        error_text: "cmus down".to_string(),
        use_colors: true,
        ..Config::default()
    };
    let output = render(&config, &AttributeMap::new());
    assert_eq!(output.text, "cmus down");
    assert_eq!(output.color_hint, None);
}

#[test]
fn test_valid_until_is_now_plus_interval() {
    let config = Config {
        poll_interval: Duration::from_secs(5),
        ..Config::default()
    };
    let now = UNIX_EPOCH + Duration::from_secs(1_000);
    let ok = render_at(&config, &playing_track(), now);
    let failed = render_at(&config, &AttributeMap::new(), now);
    assert_eq!(ok.valid_until, now + Duration::from_secs(5));
    assert_eq!(failed.valid_until, now + Duration::from_secs(5));
    assert_eq!(ok.valid_until_epoch_seconds(), 1_005.0);
}

#[test]
fn test_icons_follow_status() {
    let config = simple_config("{statusicon}");
    let icon = |status| render(&config, &track_pairs(status).into_iter().collect()).text;
    assert_eq!(icon("playing"), "P");
    assert_eq!(icon("paused"), "H");
    assert_eq!(icon("stopped"), "S");
    assert_eq!(icon("something else"), "S");
}

#[test]
fn test_color_hints() {
    let colors = Config {
        use_colors: true,
        ..Config::default()
    };
    let hint = |config: &Config, status| {
        render(config, &track_pairs(status).into_iter().collect()).color_hint
    };
    assert_eq!(hint(&colors, "playing"), Some(ColorHint::Good));
    assert_eq!(hint(&colors, "paused"), Some(ColorHint::Degraded));
    assert_eq!(hint(&colors, "stopped"), None);

    let plain = Config::default();
    assert_eq!(hint(&plain, "playing"), None);
    assert_eq!(hint(&plain, "paused"), None);
}

#[test]
fn test_title_wins_over_file() {
    let config = simple_config("{name}");
    assert_eq!(render(&config, &playing_track()).text, "Real Title");
}

#[test]
fn test_name_falls_back_to_file_name() {
    let config = simple_config("{name}");
    let attributes = without(track_pairs("playing"), "title");
    assert_eq!(render(&config, &attributes).text, "Song.mp3");

    let mut attributes = attributes;
    attributes.insert("file", "Bare.ogg");
    assert_eq!(render(&config, &attributes).text, "Bare.ogg");
}

#[test]
fn test_artist_and_album_default_to_unknown() {
    let config = simple_config("{artist}|{album}");
    let attributes: AttributeMap = track_pairs("paused").into_iter().collect();
    assert_eq!(render(&config, &attributes).text, "Unknown|Unknown");
}

#[test]
fn test_long_tracks_do_not_wrap_minutes() {
    let config = simple_config("{time}/{duration}");
    let mut attributes: AttributeMap = track_pairs("playing").into_iter().collect();
    attributes.insert("position", "7325");
    attributes.insert("duration", "7507");
    assert_eq!(render(&config, &attributes).text, "122:05/125:07");
}

#[test]
fn test_all_placeholders_render_consistently() {
    let config = simple_config(
        "{album}{time}{name}{statusicon}{duration}{artist}|{artist}{duration}{statusicon}{name}{time}{album}",
    );
    let text = render(&config, &playing_track()).text;
    assert_eq!(
        text,
        "Some Album1:05Real TitleP4:05Some Artist|Some Artist4:05PReal Title1:05Some Album"
    );
}

#[test]
fn test_render_is_idempotent_apart_from_clock() {
    let config = Config {
        use_colors: true,
        poll_interval: Duration::from_secs(3),
        ..Config::default()
    };
    let first_call = UNIX_EPOCH + Duration::from_secs(100);
    let second_call = UNIX_EPOCH + Duration::from_secs(142);
    let first = render_at(&config, &playing_track(), first_call);
    let second = render_at(&config, &playing_track(), second_call);
    assert_eq!(first.text, second.text);
    assert_eq!(first.color_hint, second.color_hint);
    assert_eq!(first.valid_until, first_call + Duration::from_secs(3));
    assert_eq!(second.valid_until, second_call + Duration::from_secs(3));
}

#[test]
fn test_malformed_output_falls_back_to_error_text() {
    let config = Config {
        use_colors: true,
        ..Config::default()
    };
    let cases = vec![
        without(track_pairs("playing"), "status"),
        without(track_pairs("playing"), "position"),
        without(track_pairs("playing"), "duration"),
        without(track_pairs("playing"), "file"),
        {
            let mut attributes: AttributeMap = track_pairs("playing").into_iter().collect();
            attributes.insert("position", "soon");
            attributes
        },
    ];
    for attributes in cases {
        let output = render(&config, &attributes);
        assert_eq!(output.text, "error");
        assert_eq!(output.color_hint, None);
    }
}

#[test]
fn test_render_errors_name_the_problem() {
    let attributes = without(track_pairs("playing"), "status");
    let track = Track::from_attributes(&attributes);
    assert_eq!(track.playback_status(), Err(RenderError::MissingStatus));

    let mut attributes: AttributeMap = track_pairs("playing").into_iter().collect();
    attributes.insert("duration", "-3");
    let err = Track::from_attributes(&attributes).duration().unwrap_err();
    assert_eq!(
        err,
        RenderError::InvalidSeconds {
            field: "duration",
            value: "-3".to_string()
        }
    );
    assert_eq!(
        err.to_string(),
        "`duration` is not a whole number of seconds: \"-3\""
    );
}

#[test]
fn test_stopped_without_track_is_idle() {
    let attributes: AttributeMap = vec![("status", "stopped"), ("aaa_mode", "all")]
        .into_iter()
        .collect();
    let track = Track::from_attributes(&attributes);
    assert!(track.is_idle());
    assert_eq!(track.position(), Err(RenderError::MissingField("position")));

    let output = render(&Config::default(), &attributes);
    assert_eq!(output.text, "error");
    assert_eq!(output.color_hint, None);
}

#[test]
fn test_loaded_or_playing_tracks_are_not_idle() {
    let stopped: AttributeMap = track_pairs("stopped").into_iter().collect();
    assert!(!Track::from_attributes(&stopped).is_idle());

    let playing: AttributeMap = vec![("status", "playing")].into_iter().collect();
    assert!(!Track::from_attributes(&playing).is_idle());

    let no_status = without(track_pairs("stopped"), "status");
    assert!(!Track::from_attributes(&no_status).is_idle());
}
