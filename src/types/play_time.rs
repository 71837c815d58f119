use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// A track offset in whole seconds, displayed as `m:ss`.
///
/// Minutes are not wrapped into hours, so `7325` seconds reads `122:05`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlayTime(u64);

impl PlayTime {
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub fn minutes(&self) -> u64 {
        self.0 / 60
    }

    pub fn seconds(&self) -> u64 {
        self.0 % 60
    }
}

impl FromStr for PlayTime {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self::from_secs)
    }
}

impl fmt::Display for PlayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.minutes(), self.seconds())
    }
}

#[test]
fn test_display() {
    assert_eq!(PlayTime::from_secs(0).to_string(), "0:00");
    assert_eq!(PlayTime::from_secs(9).to_string(), "0:09");
    assert_eq!(PlayTime::from_secs(65).to_string(), "1:05");
    assert_eq!(PlayTime::from_secs(600).to_string(), "10:00");
    assert_eq!(PlayTime::from_secs(7325).to_string(), "122:05");
}

#[test]
fn test_display_round_trips_seconds() {
    for secs in (0..20_000).step_by(37) {
        let time = PlayTime::from_secs(secs);
        let text = time.to_string();
        let (minutes, seconds) = text.split_once(':').unwrap();
        assert_eq!(seconds.len(), 2);
        let minutes: u64 = minutes.parse().unwrap();
        let seconds: u64 = seconds.parse().unwrap();
        assert!(seconds < 60);
        assert_eq!(minutes * 60 + seconds, secs);
    }
}

#[test]
fn test_parse() {
    assert_eq!("245".parse::<PlayTime>(), Ok(PlayTime::from_secs(245)));
    assert_eq!(" 12 ".parse::<PlayTime>(), Ok(PlayTime::from_secs(12)));
    assert!("-1".parse::<PlayTime>().is_err());
    assert!("1.5".parse::<PlayTime>().is_err());
    assert!("".parse::<PlayTime>().is_err());
}
