//! Fixed-width wall-clock times.
//!
//! `ClockTime` is a minute of the day in `[0, 1440)`. Its ordering is the
//! ordering of the zero-padded `HH:MM` strings it renders to, which is only
//! meaningful for times on the same calendar day.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::TimeError;

/// Minutes in a civil day.
pub const MINUTES_PER_DAY: i32 = 1440;

/// A wall-clock time with minute resolution. Serializes as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    minute_of_day: u16,
}

impl ClockTime {
    /// Midnight, `00:00`.
    pub const MIDNIGHT: Self = Self { minute_of_day: 0 };

    /// Noon, `12:00`.
    pub const NOON: Self = Self { minute_of_day: 720 };

    /// Build from hour `[0, 24)` and minute `[0, 60)`.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self {
                minute_of_day: (hour * 60 + minute) as u16,
            })
        } else {
            None
        }
    }

    /// Build from a signed minute count, wrapping into the day.
    pub fn from_minutes_wrapping(minutes: i32) -> Self {
        Self {
            minute_of_day: minutes.rem_euclid(MINUTES_PER_DAY) as u16,
        }
    }

    /// Round fractional clock hours to the nearest minute.
    ///
    /// Values outside `[0, 24)` wrap, so `24.5` becomes `00:30` and `-0.25`
    /// becomes `23:45`.
    pub fn from_hours(hours: f64) -> Result<Self, TimeError> {
        if !hours.is_finite() {
            return Err(TimeError::NonFiniteHours);
        }
        let minutes = (hours * 60.0).round() as i64;
        Ok(Self {
            minute_of_day: minutes.rem_euclid(MINUTES_PER_DAY as i64) as u16,
        })
    }

    /// Truncate a `chrono` time to its minute.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self {
            minute_of_day: (time.hour() * 60 + time.minute()) as u16,
        }
    }

    pub fn hour(self) -> u32 {
        self.minute_of_day as u32 / 60
    }

    pub fn minute(self) -> u32 {
        self.minute_of_day as u32 % 60
    }

    /// Minutes since midnight.
    pub fn minutes_of_day(self) -> i32 {
        self.minute_of_day as i32
    }

    /// Shift by a signed number of minutes, wrapping around midnight.
    pub fn add_minutes(self, minutes: i32) -> Self {
        Self::from_minutes_wrapping(self.minutes_of_day() + minutes)
    }

    /// The instant `HH:MM:00` as a `chrono` time.
    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or(NaiveTime::MIN)
    }
}

impl Display for ClockTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = TimeError;

    /// Parse `HH:MM` (or `H:MM`), ignoring a trailing zone label such as
    /// `"05:10 (BST)"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare = strip_zone_suffix(s);
        let invalid = || TimeError::InvalidClock(s.to_string());
        let (h, m) = bare.split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let minute: u32 = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).ok_or_else(invalid)
    }
}

impl From<ClockTime> for String {
    fn from(t: ClockTime) -> Self {
        t.to_string()
    }
}

impl TryFrom<String> for ClockTime {
    type Error = TimeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Drop a timezone label trailing a clock string.
///
/// `"05:10 (BST)"` → `"05:10"`, `" 21:30 +03"` → `"21:30"`.
pub fn strip_zone_suffix(s: &str) -> &str {
    let trimmed = s.trim();
    let end = trimmed
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(trimmed.len());
    &trimmed[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(ClockTime::new(5, 7).unwrap().to_string(), "05:07");
        assert_eq!(ClockTime::MIDNIGHT.to_string(), "00:00");
        assert_eq!(ClockTime::new(23, 59).unwrap().to_string(), "23:59");
    }

    #[test]
    fn rejects_out_of_range_parts() {
        assert!(ClockTime::new(24, 0).is_none());
        assert!(ClockTime::new(12, 60).is_none());
    }

    #[test]
    fn from_hours_rounds_to_nearest_minute() {
        // 5h 10m 29s
        let t = ClockTime::from_hours(5.0 + 10.0 / 60.0 + 29.0 / 3600.0).unwrap();
        assert_eq!(t.to_string(), "05:10");
        // 5h 10m 31s
        let t = ClockTime::from_hours(5.0 + 10.0 / 60.0 + 31.0 / 3600.0).unwrap();
        assert_eq!(t.to_string(), "05:11");
    }

    #[test]
    fn from_hours_wraps_around_midnight() {
        assert_eq!(ClockTime::from_hours(24.5).unwrap().to_string(), "00:30");
        assert_eq!(ClockTime::from_hours(-0.25).unwrap().to_string(), "23:45");
        assert_eq!(ClockTime::from_hours(23.9999).unwrap().to_string(), "00:00");
    }

    #[test]
    fn from_hours_rejects_nan() {
        assert_eq!(ClockTime::from_hours(f64::NAN), Err(TimeError::NonFiniteHours));
    }

    #[test]
    fn parse_plain_and_suffixed() {
        assert_eq!("05:10".parse::<ClockTime>().unwrap(), ClockTime::new(5, 10).unwrap());
        assert_eq!(
            "05:10 (BST)".parse::<ClockTime>().unwrap(),
            ClockTime::new(5, 10).unwrap()
        );
        assert_eq!("5:10".parse::<ClockTime>().unwrap(), ClockTime::new(5, 10).unwrap());
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", "5", "25:00", "12:5", "12:60", "ab:cd", "12-30", "123:00"] {
            assert!(bad.parse::<ClockTime>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn ordering_matches_padded_strings() {
        let a = ClockTime::new(9, 45).unwrap();
        let b = ClockTime::new(10, 5).unwrap();
        assert!(a < b);
        assert!(a.to_string() < b.to_string());
    }

    #[test]
    fn add_minutes_wraps() {
        let t = ClockTime::new(23, 30).unwrap().add_minutes(90);
        assert_eq!(t.to_string(), "01:00");
        let t = ClockTime::new(0, 10).unwrap().add_minutes(-20);
        assert_eq!(t.to_string(), "23:50");
    }

    #[test]
    fn naive_time_roundtrip_truncates_seconds() {
        let nt = NaiveTime::from_hms_opt(19, 0, 42).unwrap();
        let t = ClockTime::from_naive_time(nt);
        assert_eq!(t.to_string(), "19:00");
        assert_eq!(t.to_naive_time(), NaiveTime::from_hms_opt(19, 0, 0).unwrap());
    }

    #[test]
    fn serde_as_string() {
        let t = ClockTime::new(4, 3).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"04:03\"");
        let back: ClockTime = serde_json::from_str("\"04:03\"").unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<ClockTime>("\"4h03\"").is_err());
    }

    #[test]
    fn strip_suffix_variants() {
        assert_eq!(strip_zone_suffix("05:10 (BST)"), "05:10");
        assert_eq!(strip_zone_suffix("05:10(BST)"), "05:10");
        assert_eq!(strip_zone_suffix("  21:30 +03 "), "21:30");
        assert_eq!(strip_zone_suffix("12:00"), "12:00");
    }
}
