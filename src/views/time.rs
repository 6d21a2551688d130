use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("invalid meeting time {0:?}: expected \"H:MM AM\" or \"H:MM PM\"")]
    Malformed(String),
    #[error("meeting time {0:?} is out of range")]
    OutOfRange(String),
}

/// Wall-clock meeting time, stored as a 24-hour hour and minute.
///
/// Text form is the 12-hour `"H:MM AM"` / `"H:MM PM"` used by the record
/// files. The minutes may be omitted (`"12 PM"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MeetingTime {
    hour: u32,
    minute: u32,
}

impl MeetingTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(MeetingTime { hour, minute })
    }

    /// Hour on the 24-hour clock (0..=23).
    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn parse(s: &str) -> Result<Self, TimeParseError> {
        let caps = time_re()
            .captures(s)
            .ok_or_else(|| TimeParseError::Malformed(s.to_string()))?;

        let hour12: u32 = caps[1]
            .parse()
            .map_err(|_| TimeParseError::Malformed(s.to_string()))?;
        let minute: u32 = match caps.get(2) {
            Some(m) => m
                .as_str()
                .parse()
                .map_err(|_| TimeParseError::Malformed(s.to_string()))?,
            None => 0,
        };
        if !(1..=12).contains(&hour12) || minute > 59 {
            return Err(TimeParseError::OutOfRange(s.to_string()));
        }

        let pm = caps[3].eq_ignore_ascii_case("pm");
        let hour = match (hour12, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        Ok(MeetingTime { hour, minute })
    }
}

fn time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(\d{1,2})(?::(\d{2}))?\s*([AaPp][Mm])\s*$").expect("time regex is valid")
    })
}

/// Parse a 12-hour wall-clock string into its 24-hour hour.
///
/// `"12:00 AM"` is midnight (0) and `"12:00 PM"` is noon (12).
pub fn parse_hour(s: &str) -> Result<u32, TimeParseError> {
    MeetingTime::parse(s).map(|t| t.hour())
}

/// Label for an hour slot in the day view, e.g. `9:00 AM`, `12:00 PM`.
pub fn hour_label(hour: u32) -> String {
    let period = if hour < 12 { "AM" } else { "PM" };
    let h = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{h}:00 {period}")
}

impl FromStr for MeetingTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MeetingTime::parse(s)
    }
}

impl TryFrom<String> for MeetingTime {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MeetingTime::parse(&value)
    }
}

impl From<MeetingTime> for String {
    fn from(t: MeetingTime) -> String {
        t.to_string()
    }
}

impl fmt::Display for MeetingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let period = if self.hour < 12 { "AM" } else { "PM" };
        let h = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        write!(f, "{}:{:02} {}", h, self.minute, period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_regression_table() {
        assert_eq!(parse_hour("9:00 AM"), Ok(9));
        assert_eq!(parse_hour("12:00 PM"), Ok(12));
        assert_eq!(parse_hour("12:00 AM"), Ok(0));
        assert_eq!(parse_hour("2:00 PM"), Ok(14));
    }

    #[test]
    fn accepts_bare_hour_and_lowercase_period() {
        assert_eq!(parse_hour("12 AM"), Ok(0));
        assert_eq!(parse_hour("12 PM"), Ok(12));
        assert_eq!(parse_hour(" 11:45 pm "), Ok(23));
    }

    #[test]
    fn rejects_malformed_times() {
        assert!(matches!(parse_hour("14:00"), Err(TimeParseError::Malformed(_))));
        assert!(matches!(parse_hour("noon"), Err(TimeParseError::Malformed(_))));
        assert!(matches!(parse_hour(""), Err(TimeParseError::Malformed(_))));
        assert!(matches!(parse_hour("13:00 PM"), Err(TimeParseError::OutOfRange(_))));
        assert!(matches!(parse_hour("0:30 AM"), Err(TimeParseError::OutOfRange(_))));
        assert!(matches!(parse_hour("9:75 AM"), Err(TimeParseError::OutOfRange(_))));
    }

    #[test]
    fn display_uses_twelve_hour_form() {
        assert_eq!(MeetingTime::new(0, 5).unwrap().to_string(), "12:05 AM");
        assert_eq!(MeetingTime::new(14, 0).unwrap().to_string(), "2:00 PM");
        assert_eq!(MeetingTime::new(12, 30).unwrap().to_string(), "12:30 PM");
    }

    #[test]
    fn serde_uses_text_form() {
        let t: MeetingTime = serde_json::from_str("\"3:00 PM\"").unwrap();
        assert_eq!(t.hour(), 15);
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"3:00 PM\"");
        assert!(serde_json::from_str::<MeetingTime>("\"25:00\"").is_err());
    }

    #[test]
    fn hour_labels() {
        assert_eq!(hour_label(6), "6:00 AM");
        assert_eq!(hour_label(12), "12:00 PM");
        assert_eq!(hour_label(22), "10:00 PM");
        assert_eq!(hour_label(0), "12:00 AM");
        for hour in 0..24 {
            assert_eq!(hour_label(hour), MeetingTime::new(hour, 0).unwrap().to_string());
        }
    }
}
