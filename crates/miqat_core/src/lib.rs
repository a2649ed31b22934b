//! Islamic prayer-time engine.
//!
//! This crate provides:
//! - Fajr, Dhuhr, Asr, Maghrib and Isha for a date and place, under ten
//!   published calculation methods and both Asr conventions
//! - Sunrise, sunset and the night markers behind them
//! - Fallback resolution for stored preferences (coordinates, method keys)
//! - Per-prayer manual overrides
//! - A high-latitude bound for Fajr and Isha
//! - Next-prayer derivation with a countdown
//!
//! ```rust
//! use chrono::{FixedOffset, NaiveDate};
//! use miqat_core::{CalculationMethod, GeoCoordinate, Madhab, PrayerRequest, compute_daily_times};
//!
//! let req = PrayerRequest::new(
//!     NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
//!     GeoCoordinate::new(21.4225, 39.8262).unwrap(),
//!     FixedOffset::east_opt(3 * 3600).unwrap(),
//! )
//! .with_method(CalculationMethod::Makkah)
//! .with_madhab(Madhab::Standard);
//!
//! let times = compute_daily_times(&req).unwrap();
//! assert_eq!(times[0].display_name, "Fajr");
//! ```

pub mod board;
pub mod error;
pub mod high_latitude;
pub mod location;
pub mod madhab;
pub mod method;
pub mod next_prayer;
pub mod prayer;
pub mod prayer_types;
pub mod request;
pub mod solar;

pub use board::PrayerBoard;
pub use error::PrayerError;
pub use high_latitude::HighLatitudeRule;
pub use location::GeoCoordinate;
pub use madhab::Madhab;
pub use method::{CalculationMethod, IshaRule, MethodParams};
pub use next_prayer::{
    Countdown, NextPrayerState, next_prayer, pending_overnight, timeline_minutes,
};
pub use prayer::{compute_daily_times, compute_schedule};
pub use prayer_types::{
    CustomTimes, DailySchedule, HighLatitudeAdjustment, Prayer, PrayerTimeEntry,
    place_on_prayer_day,
};
pub use request::{PrayerInputs, PrayerRequest};
pub use solar::{HourAngle, SolarPosition, solar_position};

// Re-export the clock type that appears in `DailySchedule`.
pub use miqat_time::ClockTime;
