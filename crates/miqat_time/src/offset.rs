//! UTC offsets: parsing, host lookup, and conversion to hours.

use chrono::{FixedOffset, Local, NaiveDate, NaiveTime, Offset, TimeZone, Utc};

use crate::error::TimeError;

/// Largest offset in use by any civil time zone (Line Islands, UTC+14).
const MAX_OFFSET_SECONDS: i32 = 14 * 3600;

/// The offset as signed fractional hours east of UTC.
pub fn offset_hours(offset: FixedOffset) -> f64 {
    offset.local_minus_utc() as f64 / 3600.0
}

/// The host's local UTC offset in effect at noon on `date`.
///
/// Noon avoids the DST transition hours; if the zone database still has no
/// single answer the offset falls back to UTC.
pub fn local_offset_on(date: NaiveDate) -> FixedOffset {
    let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN));
    Local
        .from_local_datetime(&noon)
        .earliest()
        .map(|dt| *dt.offset())
        .unwrap_or_else(utc)
}

/// Parse a UTC offset.
///
/// Accepts `Z`/`UTC`, `±HH:MM`, `±HHMM`, `±HH`, and decimal hours such as
/// `5.5` or `-3.5`.
pub fn parse_utc_offset(s: &str) -> Result<FixedOffset, TimeError> {
    let trimmed = s.trim();
    let invalid = || TimeError::InvalidOffset(s.to_string());
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return Ok(utc());
    }

    let (sign, body) = match trimmed.as_bytes().first() {
        Some(b'+') => (1, &trimmed[1..]),
        Some(b'-') => (-1, &trimmed[1..]),
        Some(_) => (1, trimmed),
        None => return Err(invalid()),
    };

    let seconds = if let Some((h, m)) = body.split_once(':') {
        let hours: i32 = h.parse().map_err(|_| invalid())?;
        let minutes: i32 = m.parse().map_err(|_| invalid())?;
        if !(0..60).contains(&minutes) {
            return Err(invalid());
        }
        hours * 3600 + minutes * 60
    } else if body.len() == 4 && body.bytes().all(|b| b.is_ascii_digit()) {
        let hours: i32 = body[..2].parse().map_err(|_| invalid())?;
        let minutes: i32 = body[2..].parse().map_err(|_| invalid())?;
        if minutes >= 60 {
            return Err(invalid());
        }
        hours * 3600 + minutes * 60
    } else {
        let hours: f64 = body.parse().map_err(|_| invalid())?;
        if !hours.is_finite() {
            return Err(invalid());
        }
        (hours * 3600.0).round() as i32
    };

    if seconds.abs() > MAX_OFFSET_SECONDS {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * seconds).ok_or_else(invalid)
}

fn utc() -> FixedOffset {
    Utc.fix()
}
