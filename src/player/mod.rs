use std::collections::HashMap;

pub mod cmus;

pub trait Player {
    /// Queries the player once. An empty map means the player is not running
    /// or could not be queried.
    fn attributes(&mut self) -> AttributeMap;
}

/// Keys whose value is the whole rest of the line.
const RESERVED_KEYS: [&str; 4] = ["status", "duration", "position", "file"];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AttributeMap(HashMap<String, String>);

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Parses the line oriented output of `cmus-remote -Q`.
///
/// Reserved keys keep the rest of their line, every other line is read as
/// `<kind> <name> <value>` (`tag artist Foo`, `set repeat false`).
pub fn parse_attributes(output: &str) -> AttributeMap {
    let mut attributes = AttributeMap::new();
    if output.is_empty() {
        return attributes;
    }

    for line in output.lines() {
        let tokens = split_tokens(line);
        let keyword = match tokens.first() {
            Some(keyword) => *keyword,
            None => continue,
        };

        if RESERVED_KEYS.contains(&keyword) {
            attributes.insert(keyword, tokens[1..].concat());
        } else if let [_, name, value] = tokens.as_slice() {
            attributes.insert(*name, *value);
        } else {
            log::trace!("skipping short line {:?}", line);
        }
    }

    attributes
}

/// Splits a line into at most three whitespace separated tokens, the last
/// one taking the remainder of the line, trailing whitespace included.
fn split_tokens(line: &str) -> Vec<&str> {
    let mut tokens = Vec::with_capacity(3);
    let mut rest = line.trim_start();
    while !rest.is_empty() {
        if tokens.len() == 2 {
            tokens.push(rest);
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                tokens.push(&rest[..end]);
                rest = rest[end..].trim_start();
            }
            None => {
                tokens.push(rest);
                break;
            }
        }
    }
    tokens
}

#[cfg(test)]
const SAMPLE_OUTPUT: &str = "status playing
file /home/user/music/Artist - Song.flac
duration 245
position 65
tag artist Some Artist
tag album The Album
tag title A Long Title With Words
tag tracknumber 3
set aaa_mode all
set continue true
";

#[test]
fn test_parse_empty_output() {
    assert!(parse_attributes("").is_empty());
}

#[test]
fn test_parse_sample_output() {
    let attributes = parse_attributes(SAMPLE_OUTPUT);
    assert_eq!(attributes.get("status"), Some("playing"));
    assert_eq!(attributes.get("duration"), Some("245"));
    assert_eq!(attributes.get("position"), Some("65"));
    assert_eq!(attributes.get("artist"), Some("Some Artist"));
    assert_eq!(attributes.get("album"), Some("The Album"));
    assert_eq!(attributes.get("title"), Some("A Long Title With Words"));
    assert_eq!(attributes.get("tracknumber"), Some("3"));
    assert_eq!(attributes.get("aaa_mode"), Some("all"));
    assert_eq!(attributes.get("continue"), Some("true"));
}

#[test]
fn test_reserved_keys_join_remaining_tokens() {
    let attributes = parse_attributes("file /music/My Song.mp3\nstatus stopped\n");
    // Tokens two and three are glued without a separator.
    assert_eq!(attributes.get("file"), Some("/music/MySong.mp3"));
    assert_eq!(attributes.get("status"), Some("stopped"));
}

#[test]
fn test_reserved_key_without_value() {
    let attributes = parse_attributes("status\n");
    assert_eq!(attributes.get("status"), Some(""));
}

#[test]
fn test_short_tag_lines_are_skipped() {
    let attributes = parse_attributes("tag artist\nstatus paused\ntag\n");
    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes.get("artist"), None);
}

#[test]
fn test_blank_lines_are_skipped() {
    let attributes = parse_attributes("\n   \nstatus playing\n\n");
    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes.get("status"), Some("playing"));
}

#[test]
fn test_last_write_wins() {
    let attributes = parse_attributes("tag artist First\ntag artist Second\nposition 1\nposition 2");
    assert_eq!(attributes.get("artist"), Some("Second"));
    assert_eq!(attributes.get("position"), Some("2"));
}

#[test]
fn test_split_tokens_collapses_whitespace() {
    assert_eq!(
        split_tokens("  tag \t title   Two  Words  "),
        vec!["tag", "title", "Two  Words  "]
    );
    assert_eq!(split_tokens("status"), vec!["status"]);
    assert_eq!(split_tokens("status playing  "), vec!["status", "playing"]);
    assert_eq!(split_tokens("tag artist \t "), vec!["tag", "artist"]);
    assert!(split_tokens("   ").is_empty());
}

#[test]
fn test_trailing_whitespace_is_kept_in_last_token() {
    let attributes = parse_attributes("tag title Two Words  \nfile /a b.mp3 \nstatus playing  \n");
    assert_eq!(attributes.get("title"), Some("Two Words  "));
    assert_eq!(attributes.get("file"), Some("/ab.mp3 "));
    assert_eq!(attributes.get("status"), Some("playing"));
}
