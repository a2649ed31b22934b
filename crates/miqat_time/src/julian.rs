//! Julian Date conversion for Gregorian calendar dates.
//!
//! Source: Meeus, *Astronomical Algorithms*, 2nd ed., ch. 7.

use chrono::{Datelike, NaiveDate};

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Julian Date for a Gregorian calendar date.
///
/// `day` may carry a fractional part; `day = 1.0` is 0h UT on the first of
/// the month, so the result ends in `.5` for whole days.
pub fn calendar_to_jd(year: i32, month: u32, day: f64) -> f64 {
    let (y, m) = if month <= 2 {
        (year - 1, month + 12)
    } else {
        (year, month)
    };
    let a = (y as f64 / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();
    (365.25 * (y as f64 + 4716.0)).floor() + (30.6001 * (m as f64 + 1.0)).floor() + day + b
        - 1524.5
}

/// Julian Date at 0h UT of a `chrono` date.
pub fn date_to_jd(date: NaiveDate) -> f64 {
    calendar_to_jd(date.year(), date.month(), date.day() as f64)
}

/// Days elapsed since J2000.0.
pub fn days_since_j2000(jd: f64) -> f64 {
    jd - J2000_JD
}
