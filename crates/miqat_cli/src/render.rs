use std::fmt::Write;

use miqat_core::{
    CalculationMethod, ClockTime, Countdown, DailySchedule, IshaRule, Madhab, NextPrayerState,
    PrayerTimeEntry, place_on_prayer_day,
};

const MINUTES_PER_DAY: i32 = 1440;

fn madhab_name(m: Madhab) -> &'static str {
    match m {
        Madhab::Standard => "Standard",
        Madhab::Hanafi => "Hanafi",
    }
}

fn offset_label(seconds: i32) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let s = seconds.unsigned_abs();
    format!("UTC{sign}{:02}:{:02}", s / 3600, s % 3600 / 60)
}

pub fn times_table(entries: &[PrayerTimeEntry]) -> String {
    let mut out = String::new();
    for e in entries {
        let marker = if e.is_custom { "  (custom)" } else { "" };
        let _ = writeln!(out, "{:<8} {}{marker}", e.display_name, e.time);
    }
    out
}

pub fn schedule_text(s: &DailySchedule, entries: &[PrayerTimeEntry; 5]) -> String {
    let [fajr, dhuhr, asr, maghrib, isha] = entries;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} at ({:.4}, {:.4}), {}",
        s.date,
        s.coordinates.latitude(),
        s.coordinates.longitude(),
        offset_label(s.utc_offset_seconds)
    );
    let _ = writeln!(out, "Method: {}, Asr: {}", s.method, madhab_name(s.madhab));
    let _ = writeln!(out);

    let rows = [
        ("Fajr", fajr.time.clone(), s.high_latitude.fajr),
        ("Sunrise", s.sunrise.to_string(), false),
        ("Dhuhr", dhuhr.time.clone(), false),
        ("Asr", asr.time.clone(), false),
        ("Sunset", s.sunset.to_string(), false),
        ("Maghrib", maghrib.time.clone(), false),
        ("Isha", isha.time.clone(), s.high_latitude.isha),
    ];

    for (i, (label, time, adjusted)) in rows.into_iter().enumerate() {
        let mut note = String::new();
        if adjusted {
            note.push_str("  (high-latitude rule)");
        }
        // Rows after Dhuhr that read earlier than it fall after midnight.
        let wrapped = time
            .parse::<ClockTime>()
            .is_ok_and(|t| place_on_prayer_day(t, s.dhuhr, i < 2) >= MINUTES_PER_DAY);
        if wrapped {
            note.push_str("  (after midnight)");
        }
        let _ = writeln!(out, "{label:<8} {time}{note}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Middle of the night     {}", s.middle_of_the_night);
    let _ = writeln!(out, "Last third of the night {}", s.last_third_of_the_night);
    out
}

fn isha_rule_text(rule: IshaRule) -> String {
    match rule {
        IshaRule::Angle(a) => format!("{a:.1}°"),
        IshaRule::AfterMaghrib {
            minutes,
            fasting_month_minutes: Some(fasting),
        } => format!("Maghrib + {minutes:.0} min ({fasting:.0} in fasting month)"),
        IshaRule::AfterMaghrib { minutes, .. } => format!("Maghrib + {minutes:.0} min"),
    }
}

pub fn methods_table() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<22} {:>6}  {:<40} Authority", "Key", "Fajr", "Isha");
    for m in CalculationMethod::ALL {
        let p = m.params();
        let _ = writeln!(
            out,
            "{:<22} {:>5.1}°  {:<40} {}",
            m.key(),
            p.fajr_angle_deg,
            isha_rule_text(p.isha),
            m.authority()
        );
    }
    out
}

pub fn next_line(state: &NextPrayerState) -> String {
    match state.countdown {
        Countdown::Tomorrow => format!("Next: {} (tomorrow)", state.name),
        Countdown::Remaining { seconds, .. } => {
            format!("Next: {} in {} {seconds:02}s", state.name, state.time_remaining)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};
    use miqat_core::{CustomTimes, GeoCoordinate, Prayer, PrayerRequest, compute_schedule};

    fn schedule_for(lat: f64, lon: f64, hours: i32, y: i32, m: u32, d: u32) -> DailySchedule {
        compute_schedule(&PrayerRequest::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            GeoCoordinate::new(lat, lon).unwrap(),
            FixedOffset::east_opt(hours * 3600).unwrap(),
        ))
        .unwrap()
    }

    #[test]
    fn custom_entries_are_marked() {
        let entries = [
            PrayerTimeEntry::custom(Prayer::Fajr, "05:10"),
            PrayerTimeEntry::computed(Prayer::Dhuhr, "12:28".parse().unwrap()),
        ];
        let text = times_table(&entries);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Fajr     05:10  (custom)");
        assert_eq!(lines[1], "Dhuhr    12:28");
    }

    #[test]
    fn offsets_render_signed() {
        assert_eq!(offset_label(3 * 3600), "UTC+03:00");
        assert_eq!(offset_label(-(5 * 3600 + 1800)), "UTC-05:30");
        assert_eq!(offset_label(0), "UTC+00:00");
    }

    #[test]
    fn methods_table_lists_every_key() {
        let text = methods_table();
        for m in CalculationMethod::ALL {
            assert!(text.contains(m.key()), "{}", m.key());
        }
        assert!(text.contains("Maghrib + 90 min (120 in fasting month)"));
    }

    #[test]
    fn next_line_shapes() {
        let state = NextPrayerState {
            prayer: Prayer::Fajr,
            name: "Fajr".into(),
            time_remaining: "Tomorrow".into(),
            countdown: Countdown::Tomorrow,
        };
        assert_eq!(next_line(&state), "Next: Fajr (tomorrow)");

        let countdown = Countdown::from_seconds(3605);
        let state = NextPrayerState {
            prayer: Prayer::Maghrib,
            name: "Maghrib".into(),
            time_remaining: countdown.to_string(),
            countdown,
        };
        assert_eq!(next_line(&state), "Next: Maghrib in 1h 0m 05s");
    }

    #[test]
    fn schedule_lists_every_row_in_order() {
        let s = schedule_for(51.5074, -0.1278, 1, 2024, 6, 21);
        let custom = CustomTimes::new().with(Prayer::Fajr, "03:00");
        let text = schedule_text(&s, &s.entries(&custom));
        let labels: Vec<&str> = text
            .lines()
            .skip(3)
            .take(7)
            .filter_map(|l| l.split_whitespace().next())
            .collect();
        assert_eq!(
            labels,
            ["Fajr", "Sunrise", "Dhuhr", "Asr", "Sunset", "Maghrib", "Isha"]
        );
        assert!(text.contains("Fajr     03:00"), "{text}");
        assert!(text.starts_with("2024-06-21 at (51.5074, -0.1278), UTC+01:00"));
        assert!(!text.contains("after midnight"), "{text}");
    }

    #[test]
    fn schedule_marks_isha_after_midnight() {
        let s = schedule_for(60.17, 24.94, 3, 2024, 6, 21);
        let text = schedule_text(&s, &s.entries(&CustomTimes::new()));
        let isha = text.lines().find(|l| l.starts_with("Isha")).unwrap();
        assert!(isha.ends_with("(after midnight)"), "{isha}");
        let maghrib = text.lines().find(|l| l.starts_with("Maghrib")).unwrap();
        assert!(!maghrib.contains("after midnight"), "{maghrib}");
    }
}
