//! Fajr and Isha bounds for latitudes where twilight never ends.
//!
//! Above roughly 48.5 degrees the Sun may stay shallower than the Fajr or
//! Isha angle all night around the summer solstice. Each rule caps the
//! sunrise-to-Fajr and sunset-to-Isha gaps at a fraction of the night.
//! The night length is taken from the same date's sunset and sunrise,
//! `(sunrise - sunset) mod 24h`, which differs from the following night by
//! at most a few minutes. The cap replaces the angle time when the angle
//! is never reached or when the angle time lies beyond the cap.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Rule bounding Fajr and Isha at high latitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HighLatitudeRule {
    /// Gap is `angle / 60` of the night.
    #[default]
    AngleBased,
    /// Gap is half the night.
    MiddleOfTheNight,
    /// Gap is one seventh of the night.
    SeventhOfTheNight,
}

impl HighLatitudeRule {
    pub const ALL: [Self; 3] = [
        Self::AngleBased,
        Self::MiddleOfTheNight,
        Self::SeventhOfTheNight,
    ];

    /// Fraction of the night allowed between twilight and sunrise/sunset.
    pub fn night_fraction(self, angle_deg: f64) -> f64 {
        match self {
            Self::AngleBased => angle_deg / 60.0,
            Self::MiddleOfTheNight => 0.5,
            Self::SeventhOfTheNight => 1.0 / 7.0,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::AngleBased => "angle-based",
            Self::MiddleOfTheNight => "middle-of-the-night",
            Self::SeventhOfTheNight => "seventh-of-the-night",
        }
    }
}

impl Display for HighLatitudeRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for HighLatitudeRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.key() == s)
            .ok_or_else(|| {
                format!(
                    "unknown high-latitude rule {s:?} (expected one of: angle-based, \
                     middle-of-the-night, seventh-of-the-night)"
                )
            })
    }
}

/// Which side of the night a twilight time sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Twilight {
    /// Before sunrise (Fajr).
    Dawn,
    /// After sunset (Isha).
    Dusk,
}

/// Bound a twilight time against its base event.
///
/// `time` and `base` are clock hours; `max_gap` is the largest allowed
/// distance in hours. Returns the resulting time and whether the bound
/// replaced the angle time.
pub(crate) fn bound_twilight(
    time: Option<f64>,
    base: f64,
    max_gap: f64,
    side: Twilight,
) -> (f64, bool) {
    let bounded = match side {
        Twilight::Dawn => base - max_gap,
        Twilight::Dusk => base + max_gap,
    };
    match time {
        Some(t) => {
            let gap = match side {
                Twilight::Dawn => (base - t).rem_euclid(24.0),
                Twilight::Dusk => (t - base).rem_euclid(24.0),
            };
            if gap > max_gap { (bounded, true) } else { (t, false) }
        }
        None => (bounded, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractions() {
        assert!((HighLatitudeRule::AngleBased.night_fraction(18.0) - 0.3).abs() < 1e-12);
        assert_eq!(HighLatitudeRule::MiddleOfTheNight.night_fraction(18.0), 0.5);
        assert!((HighLatitudeRule::SeventhOfTheNight.night_fraction(18.0) - 1.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn parse_keys() {
        for r in HighLatitudeRule::ALL {
            assert_eq!(r.key().parse::<HighLatitudeRule>(), Ok(r));
        }
        assert!("nearest-latitude".parse::<HighLatitudeRule>().is_err());
    }

    #[test]
    fn missing_dawn_uses_bound() {
        let (t, adjusted) = bound_twilight(None, 4.5, 2.0, Twilight::Dawn);
        assert!(adjusted);
        assert!((t - 2.5).abs() < 1e-12);
    }

    #[test]
    fn close_dusk_kept() {
        let (t, adjusted) = bound_twilight(Some(21.0), 19.5, 2.0, Twilight::Dusk);
        assert!(!adjusted);
        assert_eq!(t, 21.0);
    }

    #[test]
    fn far_dusk_capped() {
        let (t, adjusted) = bound_twilight(Some(23.9), 21.0, 2.0, Twilight::Dusk);
        assert!(adjusted);
        assert!((t - 23.0).abs() < 1e-12);
    }

    #[test]
    fn far_dawn_capped() {
        let (t, adjusted) = bound_twilight(Some(1.0), 4.5, 2.0, Twilight::Dawn);
        assert!(adjusted);
        assert!((t - 2.5).abs() < 1e-12);
    }
}
