//! Low-precision solar coordinates and hour-angle geometry.
//!
//! Accurate to about one arcminute between 1950 and 2050, which is well
//! inside the one-minute rounding applied to prayer times.
//!
//! Sources: U.S. Naval Observatory "Approximate Solar Coordinates";
//! standard spherical astronomy for the hour angle at a given altitude
//! (Meeus ch. 15).

use miqat_time::days_since_j2000;

/// Sun's depression at sunrise and sunset in degrees:
/// 34' refraction plus 16' semidiameter, rounded as published.
pub const SUNRISE_DEPRESSION_DEG: f64 = 0.833;

/// Sun position quantities needed for daily event times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    /// Apparent declination in degrees.
    pub declination_deg: f64,
    /// Equation of time in hours, in [-12, 12). Positive when the true Sun
    /// runs ahead of the mean Sun.
    pub equation_of_time_hours: f64,
}

/// Solar declination and equation of time at a Julian Date.
///
/// ```text
/// D = JD - 2451545.0
/// g = 357.529 + 0.98560028 D          (mean anomaly)
/// q = 280.459 + 0.98564736 D          (mean longitude)
/// L = q + 1.915 sin g + 0.020 sin 2g  (ecliptic longitude)
/// e = 23.439 - 0.00000036 D           (obliquity)
/// RA = atan2(cos e sin L, cos L)
/// dec = asin(sin e sin L)
/// EqT = q/15 - RA/15
/// ```
pub fn solar_position(jd: f64) -> SolarPosition {
    let d = days_since_j2000(jd);
    let g = (357.529 + 0.985_600_28 * d).rem_euclid(360.0);
    let q = (280.459 + 0.985_647_36 * d).rem_euclid(360.0);
    let g_rad = g.to_radians();
    let l = (q + 1.915 * g_rad.sin() + 0.020 * (2.0 * g_rad).sin()).rem_euclid(360.0);
    let e = (23.439 - 0.000_000_36 * d).to_radians();
    let l_rad = l.to_radians();

    let ra_hours = (e.cos() * l_rad.sin())
        .atan2(l_rad.cos())
        .to_degrees()
        .rem_euclid(360.0)
        / 15.0;
    let eqt = q / 15.0 - ra_hours;
    let declination_deg = (e.sin() * l_rad.sin()).asin().to_degrees();

    SolarPosition {
        declination_deg,
        equation_of_time_hours: (eqt + 12.0).rem_euclid(24.0) - 12.0,
    }
}

/// Local mean solar time of the Sun's transit, in hours.
pub fn transit_hours(position: &SolarPosition) -> f64 {
    (12.0 - position.equation_of_time_hours).rem_euclid(24.0)
}

/// Outcome of solving for the hour angle at a target altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HourAngle {
    /// The Sun crosses the altitude this many hours either side of transit.
    Hours(f64),
    /// The Sun stays below the target altitude all day.
    AlwaysBelow,
    /// The Sun stays above the target altitude all day.
    AlwaysAbove,
}

impl HourAngle {
    pub fn hours(self) -> Option<f64> {
        match self {
            Self::Hours(h) => Some(h),
            Self::AlwaysBelow | Self::AlwaysAbove => None,
        }
    }
}

/// Hour angle (in hours) at which the Sun is `depression_deg` below the
/// horizon. Negative depressions are altitudes above the horizon.
///
/// `cos H = (sin(-dep) - sin(phi) sin(dec)) / (cos(phi) cos(dec))`
pub fn hour_angle(depression_deg: f64, latitude_deg: f64, declination_deg: f64) -> HourAngle {
    let phi = latitude_deg.to_radians();
    let dec = declination_deg.to_radians();
    let alt = (-depression_deg).to_radians();
    let cos_h = (alt.sin() - phi.sin() * dec.sin()) / (phi.cos() * dec.cos());

    if cos_h.is_nan() || cos_h > 1.0 {
        return HourAngle::AlwaysBelow;
    }
    if cos_h < -1.0 {
        return HourAngle::AlwaysAbove;
    }
    HourAngle::Hours(cos_h.acos().to_degrees() / 15.0)
}

/// Depression (negative: altitude) at which an object's shadow reaches
/// `shadow_ratio` times its height plus its noon shadow.
///
/// `alt = acot(ratio + tan|phi - dec|)`
pub fn asr_depression_deg(shadow_ratio: f64, latitude_deg: f64, declination_deg: f64) -> f64 {
    let noon_zenith = (latitude_deg - declination_deg).abs().to_radians();
    let altitude = (1.0 / (shadow_ratio + noon_zenith.tan())).atan().to_degrees();
    -altitude
}
