use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Captures;
use regex::Regex;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([a-z]+)\}").unwrap());

/// Values available to a status template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields<'a> {
    pub name: &'a str,
    pub artist: &'a str,
    pub album: &'a str,
    pub time: String,
    pub duration: String,
    pub status_icon: char,
}

impl Fields<'_> {
    fn lookup(&self, placeholder: &str) -> Option<Cow<'_, str>> {
        let value = match placeholder {
            "name" => Cow::Borrowed(self.name),
            "artist" => Cow::Borrowed(self.artist),
            "album" => Cow::Borrowed(self.album),
            "time" => Cow::Borrowed(self.time.as_str()),
            "duration" => Cow::Borrowed(self.duration.as_str()),
            "statusicon" => Cow::Owned(self.status_icon.to_string()),
            _ => return None,
        };
        Some(value)
    }
}

/// Substitutes every known `{placeholder}` in `template`.
///
/// Unknown placeholders and stray braces are copied through unchanged.
pub fn fill(template: &str, fields: &Fields<'_>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match fields.lookup(&caps[1]) {
            Some(value) => value.into_owned(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
fn sample_fields() -> Fields<'static> {
    Fields {
        name: "Song",
        artist: "Band",
        album: "Record",
        time: "1:05".to_string(),
        duration: "4:05".to_string(),
        status_icon: '>',
    }
}

#[test]
fn test_fill_all_placeholders() {
    let text = fill(
        "{statusicon} {name} - {artist} [{album}] {time}/{duration}",
        &sample_fields(),
    );
    assert_eq!(text, "> Song - Band [Record] 1:05/4:05");
}

#[test]
fn test_fill_repeated_placeholders_in_any_order() {
    let text = fill(
        "{duration}{name}{time}{name}{statusicon}{album}{artist}{duration}{statusicon}",
        &sample_fields(),
    );
    assert_eq!(text, "4:05Song1:05Song>RecordBand4:05>");
}

#[test]
fn test_unknown_placeholders_pass_through() {
    let text = fill("{name} {year} {} {Name} { name }", &sample_fields());
    assert_eq!(text, "Song {year} {} {Name} { name }");
}

#[test]
fn test_doubled_braces_are_not_escapes() {
    assert_eq!(fill("{{name}}", &sample_fields()), "{Song}");
    assert_eq!(fill("{{year}}", &sample_fields()), "{{year}}");
}

#[test]
fn test_stray_braces_pass_through() {
    assert_eq!(fill("}{ {name", &sample_fields()), "}{ {name");
    assert_eq!(fill("", &sample_fields()), "");
}

#[test]
fn test_values_are_not_substituted_again() {
    let fields = Fields {
        name: "{artist}",
        ..sample_fields()
    };
    assert_eq!(fill("{name} by {artist}", &fields), "{artist} by Band");
}
