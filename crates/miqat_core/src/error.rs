//! Error types for prayer-time computation.

use std::error::Error;
use std::fmt::{Display, Formatter};

use miqat_time::TimeError;

/// Errors from the prayer-time engine.
///
/// Bad coordinates and unknown method keys are not errors; they resolve to
/// defaults. Only a failed astronomical evaluation reaches the caller.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PrayerError {
    /// The Sun stays below the horizon all day (polar night).
    NeverRises { latitude_deg: f64 },
    /// The Sun stays above the horizon all day (midnight sun).
    NeverSets { latitude_deg: f64 },
    /// A formula produced no usable value.
    Computation(String),
    /// Converting a solar time to a wall-clock time failed.
    Time(TimeError),
}

impl Display for PrayerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NeverRises { latitude_deg } => write!(
                f,
                "prayer times unavailable: the sun does not rise at latitude {latitude_deg:.4}"
            ),
            Self::NeverSets { latitude_deg } => write!(
                f,
                "prayer times unavailable: the sun does not set at latitude {latitude_deg:.4}"
            ),
            Self::Computation(msg) => write!(f, "prayer time computation failed: {msg}"),
            Self::Time(e) => write!(f, "time error: {e}"),
        }
    }
}

impl Error for PrayerError {}

impl From<TimeError> for PrayerError {
    fn from(e: TimeError) -> Self {
        Self::Time(e)
    }
}
