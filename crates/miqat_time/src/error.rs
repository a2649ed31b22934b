//! Error types for clock and offset parsing.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from clock-time, offset, or calendar conversion.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TimeError {
    /// A wall-clock string was not of the form `HH:MM`.
    InvalidClock(String),
    /// A UTC offset string could not be parsed or is out of range.
    InvalidOffset(String),
    /// A fractional-hour value was not finite.
    NonFiniteHours,
}

impl Display for TimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidClock(s) => write!(f, "invalid clock time: {s:?}"),
            Self::InvalidOffset(s) => write!(f, "invalid UTC offset: {s:?}"),
            Self::NonFiniteHours => write!(f, "time of day is not a finite number of hours"),
        }
    }
}

impl Error for TimeError {}
