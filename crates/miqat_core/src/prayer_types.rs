//! Types for daily prayer times: prayer names, overrides, entries, and the
//! full solar-day schedule behind them.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use miqat_time::{ClockTime, MINUTES_PER_DAY};
use serde::{Deserialize, Serialize};

use crate::location::GeoCoordinate;
use crate::madhab::Madhab;
use crate::method::CalculationMethod;

/// The five daily prayers, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prayer {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    /// All prayers in output order.
    pub const ALL: [Self; 5] = [Self::Fajr, Self::Dhuhr, Self::Asr, Self::Maghrib, Self::Isha];

    /// Lowercase key used in overrides and serialized entries.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Fajr => "fajr",
            Self::Dhuhr => "dhuhr",
            Self::Asr => "asr",
            Self::Maghrib => "maghrib",
            Self::Isha => "isha",
        }
    }

    /// Human label.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Fajr => "Fajr",
            Self::Dhuhr => "Dhuhr",
            Self::Asr => "Asr",
            Self::Maghrib => "Maghrib",
            Self::Isha => "Isha",
        }
    }
}

impl Display for Prayer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Prayer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.key() == lower)
            .ok_or_else(|| format!("unknown prayer {s:?}"))
    }
}

/// User-supplied literal times that replace computed ones.
///
/// Values are kept verbatim; empty or blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomTimes(BTreeMap<Prayer, String>);

impl CustomTimes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, prayer: Prayer, time: impl Into<String>) -> Self {
        self.insert(prayer, time);
        self
    }

    pub fn insert(&mut self, prayer: Prayer, time: impl Into<String>) {
        self.0.insert(prayer, time.into());
    }

    pub fn remove(&mut self, prayer: Prayer) -> Option<String> {
        self.0.remove(&prayer)
    }

    /// The override for `prayer`, if one is set and non-blank.
    pub fn get(&self, prayer: Prayer) -> Option<&str> {
        self.0
            .get(&prayer)
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Whether no prayer has an effective override.
    pub fn is_empty(&self) -> bool {
        Prayer::ALL.iter().all(|p| self.get(*p).is_none())
    }

    /// Merge `other` on top of `self`; non-blank values in `other` win.
    pub fn merged_with(&self, other: &CustomTimes) -> CustomTimes {
        let mut out = self.clone();
        for prayer in Prayer::ALL {
            if let Some(t) = other.get(prayer) {
                out.insert(prayer, t);
            }
        }
        out
    }
}

impl FromIterator<(Prayer, String)> for CustomTimes {
    fn from_iter<I: IntoIterator<Item = (Prayer, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One prayer time as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerTimeEntry {
    pub name: Prayer,
    /// Local `HH:MM`, or the override string verbatim.
    pub time: String,
    pub display_name: String,
    pub is_custom: bool,
}

impl PrayerTimeEntry {
    pub fn computed(prayer: Prayer, time: ClockTime) -> Self {
        Self {
            name: prayer,
            time: time.to_string(),
            display_name: prayer.display_name().to_string(),
            is_custom: false,
        }
    }

    pub fn custom(prayer: Prayer, time: &str) -> Self {
        Self {
            name: prayer,
            time: time.to_string(),
            display_name: prayer.display_name().to_string(),
            is_custom: true,
        }
    }
}

/// Which twilight times were replaced by the high-latitude bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighLatitudeAdjustment {
    pub fajr: bool,
    pub isha: bool,
}

impl HighLatitudeAdjustment {
    pub fn any(self) -> bool {
        self.fajr || self.isha
    }
}

/// All computed events of one day at one place, in local clock time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySchedule {
    pub date: NaiveDate,
    pub coordinates: GeoCoordinate,
    pub method: CalculationMethod,
    pub madhab: Madhab,
    /// Offset used for local time, in seconds east of UTC.
    pub utc_offset_seconds: i32,
    pub fajr: ClockTime,
    pub sunrise: ClockTime,
    pub dhuhr: ClockTime,
    pub asr: ClockTime,
    pub sunset: ClockTime,
    pub maghrib: ClockTime,
    pub isha: ClockTime,
    /// Halfway from Maghrib to the next day's Fajr.
    pub middle_of_the_night: ClockTime,
    /// Start of the last third of the night (Maghrib to next Fajr).
    pub last_third_of_the_night: ClockTime,
    pub high_latitude: HighLatitudeAdjustment,
}

impl DailySchedule {
    /// Computed time of one prayer.
    pub fn time_of(&self, prayer: Prayer) -> ClockTime {
        match prayer {
            Prayer::Fajr => self.fajr,
            Prayer::Dhuhr => self.dhuhr,
            Prayer::Asr => self.asr,
            Prayer::Maghrib => self.maghrib,
            Prayer::Isha => self.isha,
        }
    }

    /// Sunrise, sunset and the five prayers placed on the prayer day, in
    /// minutes from the date's midnight. Order: fajr, sunrise, dhuhr, asr,
    /// sunset, maghrib, isha.
    ///
    /// Evening events that wrapped past midnight come out above 1440, so the
    /// values are strictly increasing even when the clock times are not.
    pub fn day_minutes(&self) -> [i32; 7] {
        let d = self.dhuhr;
        [
            place_on_prayer_day(self.fajr, d, true),
            place_on_prayer_day(self.sunrise, d, true),
            place_on_prayer_day(self.dhuhr, d, false),
            place_on_prayer_day(self.asr, d, false),
            place_on_prayer_day(self.sunset, d, false),
            place_on_prayer_day(self.maghrib, d, false),
            place_on_prayer_day(self.isha, d, false),
        ]
    }

    /// The five entries in fixed order, with overrides applied.
    pub fn entries(&self, custom: &CustomTimes) -> [PrayerTimeEntry; 5] {
        Prayer::ALL.map(|prayer| match custom.get(prayer) {
            Some(t) => PrayerTimeEntry::custom(prayer, t),
            None => PrayerTimeEntry::computed(prayer, self.time_of(prayer)),
        })
    }
}

/// Minute of the prayer day for a wall-clock time.
///
/// Dhuhr anchors the day. An event before Dhuhr (Fajr, sunrise) that reads
/// later than Dhuhr belongs to the previous evening; an event after Dhuhr
/// that reads earlier than Dhuhr has wrapped past midnight. Either is moved
/// by one day.
pub fn place_on_prayer_day(time: ClockTime, dhuhr: ClockTime, before_dhuhr: bool) -> i32 {
    let m = time.minutes_of_day();
    let anchor = dhuhr.minutes_of_day();
    if before_dhuhr && m > anchor {
        m - MINUTES_PER_DAY
    } else if !before_dhuhr && m < anchor {
        m + MINUTES_PER_DAY
    } else {
        m
    }
}
