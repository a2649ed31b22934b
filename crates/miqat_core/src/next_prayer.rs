//! Which prayer comes next, and how long until it does.
//!
//! Entries are compared as `HH:MM` clock values placed on the prayer day:
//! an Asr, Maghrib or Isha that reads earlier than Dhuhr has wrapped past
//! midnight and counts as the following day (summer nights at high
//! latitudes). A trailing zone label (`"05:10 (BST)"`) is ignored and an
//! entry that is not a clock time is skipped, so a malformed override
//! cannot hide the prayers after it. Once Isha has passed the state reports
//! Fajr with a "Tomorrow" countdown; no time to the next day's Fajr is
//! computed. After midnight, [`pending_overnight`] finds a prayer from the
//! previous day's entries that is still ahead.

use std::fmt::{Display, Formatter};

use chrono::{NaiveTime, Timelike};
use log::warn;
use miqat_time::ClockTime;
use serde::{Deserialize, Serialize};

use crate::prayer_types::{Prayer, PrayerTimeEntry, place_on_prayer_day};

const SECONDS_PER_DAY: i64 = 86_400;

/// Time left until the next prayer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Countdown {
    Remaining {
        hours: u32,
        minutes: u32,
        seconds: u32,
    },
    /// Every prayer of the day has passed.
    Tomorrow,
}

impl Countdown {
    pub fn from_seconds(total: i64) -> Self {
        let total = total.max(0) as u32;
        Self::Remaining {
            hours: total / 3600,
            minutes: total % 3600 / 60,
            seconds: total % 60,
        }
    }

    /// Whole seconds left, or `None` for [`Countdown::Tomorrow`].
    pub fn total_seconds(self) -> Option<u32> {
        match self {
            Self::Remaining {
                hours,
                minutes,
                seconds,
            } => Some(hours * 3600 + minutes * 60 + seconds),
            Self::Tomorrow => None,
        }
    }
}

impl Display for Countdown {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remaining { hours, minutes, .. } => write!(f, "{hours}h {minutes}m"),
            Self::Tomorrow => f.write_str("Tomorrow"),
        }
    }
}

/// The soonest prayer not yet passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPrayerState {
    pub prayer: Prayer,
    /// Display label, e.g. `"Maghrib"`.
    pub name: String,
    /// Rendered countdown, e.g. `"1h 0m"` or `"Tomorrow"`.
    pub time_remaining: String,
    pub countdown: Countdown,
}

impl NextPrayerState {
    fn new(prayer: Prayer, countdown: Countdown) -> Self {
        Self {
            prayer,
            name: prayer.display_name().to_string(),
            time_remaining: countdown.to_string(),
            countdown,
        }
    }
}

/// Minute of the prayer day for each entry, `None` where the time does not
/// parse. See [`place_on_prayer_day`].
pub fn timeline_minutes(entries: &[PrayerTimeEntry]) -> Vec<Option<i32>> {
    let parsed: Vec<Option<ClockTime>> = entries
        .iter()
        .map(|e| e.time.parse::<ClockTime>().ok())
        .collect();
    let dhuhr = entries
        .iter()
        .zip(&parsed)
        .find_map(|(e, t)| if e.name == Prayer::Dhuhr { *t } else { None })
        // No readable Dhuhr: anchor at noon.
        .unwrap_or(ClockTime::NOON);
    entries
        .iter()
        .zip(parsed)
        .map(|(e, t)| t.map(|t| place_on_prayer_day(t, dhuhr, e.name < Prayer::Dhuhr)))
        .collect()
}

/// First entry strictly after `now_seconds`, measured from the start of the
/// entries' own calendar day.
fn first_after(entries: &[PrayerTimeEntry], now_seconds: i64) -> Option<NextPrayerState> {
    let current_minute = now_seconds / 60;
    for (entry, minute) in entries.iter().zip(timeline_minutes(entries)) {
        let Some(minute) = minute else {
            warn!(
                "skipping {} in next-prayer scan: {:?} is not a clock time",
                entry.name.key(),
                entry.time
            );
            continue;
        };
        let minute = i64::from(minute);
        if minute > current_minute {
            let remaining = minute * 60 - now_seconds;
            return Some(NextPrayerState::new(
                entry.name,
                Countdown::from_seconds(remaining),
            ));
        }
    }
    None
}

/// Derive the next prayer from today's entries and the current local time.
///
/// The first entry whose minute on the prayer day is strictly later than
/// the current minute wins; the countdown runs to that minute's first
/// second, past midnight if the entry wrapped.
pub fn next_prayer(entries: &[PrayerTimeEntry], now: NaiveTime) -> NextPrayerState {
    first_after(entries, i64::from(now.num_seconds_from_midnight()))
        .unwrap_or_else(|| NextPrayerState::new(Prayer::Fajr, Countdown::Tomorrow))
}

/// A prayer from yesterday's entries that wrapped past midnight and is still
/// ahead of `now` (today's local time).
pub fn pending_overnight(entries: &[PrayerTimeEntry], now: NaiveTime) -> Option<NextPrayerState> {
    first_after(
        entries,
        i64::from(now.num_seconds_from_midnight()) + SECONDS_PER_DAY,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(times: [&str; 5]) -> Vec<PrayerTimeEntry> {
        Prayer::ALL
            .iter()
            .zip(times)
            .map(|(p, t)| PrayerTimeEntry::custom(*p, t))
            .collect()
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    const DAY: [&str; 5] = ["05:00", "12:30", "16:00", "20:00", "21:30"];

    #[test]
    fn evening_points_at_maghrib() {
        let s = next_prayer(&entries(DAY), at(19, 0, 0));
        assert_eq!(s.name, "Maghrib");
        assert_eq!(s.time_remaining, "1h 0m");
        assert_eq!(s.countdown.total_seconds(), Some(3600));
    }

    #[test]
    fn after_isha_is_tomorrow() {
        let s = next_prayer(&entries(DAY), at(22, 15, 0));
        assert_eq!(s.prayer, Prayer::Fajr);
        assert_eq!(s.name, "Fajr");
        assert_eq!(s.time_remaining, "Tomorrow");
        assert_eq!(s.countdown.total_seconds(), None);
    }

    #[test]
    fn exactly_at_prayer_minute_moves_on() {
        let s = next_prayer(&entries(DAY), at(20, 0, 30));
        assert_eq!(s.prayer, Prayer::Isha);
        assert_eq!(s.countdown.total_seconds(), Some(5370));
    }

    #[test]
    fn seconds_counted() {
        let s = next_prayer(&entries(DAY), at(11, 59, 15));
        assert_eq!(s.prayer, Prayer::Dhuhr);
        assert_eq!(
            s.countdown,
            Countdown::Remaining {
                hours: 0,
                minutes: 30,
                seconds: 45
            }
        );
        assert_eq!(s.time_remaining, "0h 30m");
    }

    #[test]
    fn before_fajr_points_at_fajr() {
        let s = next_prayer(&entries(DAY), at(0, 0, 0));
        assert_eq!(s.prayer, Prayer::Fajr);
        assert_eq!(s.time_remaining, "5h 0m");
    }

    #[test]
    fn zone_suffix_is_stripped() {
        let list = entries(["05:00 (BST)", "12:30 (BST)", "16:00", "20:00", "21:30"]);
        let s = next_prayer(&list, at(6, 0, 0));
        assert_eq!(s.prayer, Prayer::Dhuhr);
    }

    #[test]
    fn unpadded_override_compares_by_value() {
        // "9:05" sorts after "12:30" as a string but is earlier in the day.
        let list = entries(["9:05", "12:30", "16:00", "20:00", "21:30"]);
        let s = next_prayer(&list, at(10, 0, 0));
        assert_eq!(s.prayer, Prayer::Dhuhr);
    }

    #[test]
    fn malformed_entry_skipped() {
        let list = entries(["05:00", "soon", "16:00", "20:00", "21:30"]);
        let s = next_prayer(&list, at(13, 0, 0));
        assert_eq!(s.prayer, Prayer::Asr);
    }

    #[test]
    fn isha_after_midnight_is_still_ahead() {
        // Helsinki at the June solstice: Isha falls at 00:16.
        let list = entries(["02:23", "13:22", "18:04", "22:51", "00:16"]);
        let s = next_prayer(&list, at(23, 50, 0));
        assert_eq!(s.prayer, Prayer::Isha);
        assert_eq!(s.countdown.total_seconds(), Some(26 * 60));
        assert_eq!(s.time_remaining, "0h 26m");

        let s = next_prayer(&list, at(20, 0, 0));
        assert_eq!(s.prayer, Prayer::Maghrib);
    }

    #[test]
    fn maghrib_after_midnight_is_still_ahead() {
        let list = entries(["01:32", "13:20", "18:16", "01:02", "01:14"]);
        let s = next_prayer(&list, at(19, 0, 0));
        assert_eq!(s.prayer, Prayer::Maghrib);
        assert_eq!(s.time_remaining, "6h 2m");
        assert_eq!(
            timeline_minutes(&list),
            vec![Some(92), Some(800), Some(1096), Some(1502), Some(1514)]
        );
    }

    #[test]
    fn yesterdays_isha_pending_after_midnight() {
        let yesterday = entries(["02:23", "13:22", "18:04", "22:51", "00:16"]);
        let s = pending_overnight(&yesterday, at(0, 5, 0)).unwrap();
        assert_eq!(s.prayer, Prayer::Isha);
        assert_eq!(s.countdown.total_seconds(), Some(11 * 60));

        assert_eq!(pending_overnight(&yesterday, at(0, 16, 0)), None);
        assert_eq!(pending_overnight(&entries(DAY), at(0, 5, 0)), None);
        assert_eq!(pending_overnight(&[], at(0, 5, 0)), None);
    }

    #[test]
    fn empty_list_is_tomorrow() {
        let s = next_prayer(&[], at(13, 0, 0));
        assert_eq!(s.countdown, Countdown::Tomorrow);
    }
}
