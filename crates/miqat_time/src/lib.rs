//! Calendar and clock primitives for prayer-time computation.
//!
//! This crate provides:
//! - Julian Date conversion for civil calendar dates
//! - `ClockTime`, a fixed-width, zero-padded `HH:MM` wall-clock value
//! - UTC offset parsing and host-local offset lookup

pub mod clock;
pub mod error;
pub mod julian;
pub mod offset;

pub use clock::{ClockTime, MINUTES_PER_DAY, strip_zone_suffix};
pub use error::TimeError;
pub use julian::{J2000_JD, calendar_to_jd, date_to_jd, days_since_j2000};
pub use offset::{local_offset_on, offset_hours, parse_utc_offset};
