//! Daily prayer-time computation.
//!
//! Each event is the time the Sun reaches a given altitude, solved from the
//! hour-angle formula around local solar transit. A first pass evaluates the
//! Sun at fixed guesses (05:00, 06:00, 12:00, 13:00, 18:00); the second pass
//! re-evaluates at the first-pass results. Times are then shifted from
//! local mean solar time to the requested UTC offset, bounded by the
//! high-latitude rule, and rounded to the minute.

use log::debug;
use miqat_time::{ClockTime, date_to_jd, offset_hours};

use crate::error::PrayerError;
use crate::high_latitude::{Twilight, bound_twilight};
use crate::method::MethodParams;
use crate::prayer_types::{DailySchedule, HighLatitudeAdjustment, Prayer, PrayerTimeEntry};
use crate::request::PrayerRequest;
use crate::solar::{
    HourAngle, SUNRISE_DEPRESSION_DEG, SolarPosition, asr_depression_deg, hour_angle,
    solar_position, transit_hours,
};

/// Evaluation passes over the day.
const REFINEMENT_PASSES: usize = 2;

/// Minutes added to sunset for Maghrib.
const MAGHRIB_SAFETY_MINUTES: f64 = 1.0;

/// Event times of one pass, in local mean solar hours.
#[derive(Debug, Clone, Copy)]
struct SolarDayHours {
    fajr: Option<f64>,
    sunrise: f64,
    dhuhr: f64,
    asr: f64,
    sunset: f64,
    isha: Option<f64>,
}

const INITIAL_GUESS: SolarDayHours = SolarDayHours {
    fajr: Some(5.0),
    sunrise: 6.0,
    dhuhr: 12.0,
    asr: 13.0,
    sunset: 18.0,
    isha: Some(18.0),
};

/// Event times in local clock hours, before rounding.
#[derive(Debug, Clone, Copy)]
struct LocalDayHours {
    fajr: f64,
    sunrise: f64,
    dhuhr: f64,
    asr: f64,
    sunset: f64,
    maghrib: f64,
    isha: f64,
    adjustment: HighLatitudeAdjustment,
}

impl LocalDayHours {
    fn prayer(&self, prayer: Prayer) -> f64 {
        match prayer {
            Prayer::Fajr => self.fajr,
            Prayer::Dhuhr => self.dhuhr,
            Prayer::Asr => self.asr,
            Prayer::Maghrib => self.maghrib,
            Prayer::Isha => self.isha,
        }
    }
}

/// Fixed quantities for one date and place.
struct DaySolver {
    /// JD of 0h local mean time at the observer's longitude.
    jd_local_midnight: f64,
    latitude_deg: f64,
    params: &'static MethodParams,
    shadow_ratio: f64,
}

impl DaySolver {
    fn new(req: &PrayerRequest) -> Self {
        Self {
            jd_local_midnight: date_to_jd(req.date) - req.coordinates.longitude() / 360.0,
            latitude_deg: req.coordinates.latitude(),
            params: req.method.params(),
            shadow_ratio: req.madhab.shadow_ratio(),
        }
    }

    fn position_at(&self, hours: f64) -> SolarPosition {
        solar_position(self.jd_local_midnight + hours / 24.0)
    }

    /// Time the Sun reaches `depression_deg`, before (`rising`) or after transit.
    fn crossing(&self, depression_deg: f64, guess: f64, rising: bool) -> Result<f64, HourAngle> {
        let pos = self.position_at(guess);
        let transit = transit_hours(&pos);
        match hour_angle(depression_deg, self.latitude_deg, pos.declination_deg) {
            HourAngle::Hours(h) => Ok(if rising { transit - h } else { transit + h }),
            other => Err(other),
        }
    }

    fn polar_error(&self, outcome: HourAngle) -> PrayerError {
        match outcome {
            HourAngle::AlwaysAbove => PrayerError::NeverSets {
                latitude_deg: self.latitude_deg,
            },
            _ => PrayerError::NeverRises {
                latitude_deg: self.latitude_deg,
            },
        }
    }

    fn solve_pass(&self, guess: &SolarDayHours) -> Result<SolarDayHours, PrayerError> {
        let sunrise = self
            .crossing(SUNRISE_DEPRESSION_DEG, guess.sunrise, true)
            .map_err(|h| self.polar_error(h))?;
        let sunset = self
            .crossing(SUNRISE_DEPRESSION_DEG, guess.sunset, false)
            .map_err(|h| self.polar_error(h))?;

        let dhuhr = transit_hours(&self.position_at(guess.dhuhr));

        let asr_dep = asr_depression_deg(
            self.shadow_ratio,
            self.latitude_deg,
            self.position_at(guess.asr).declination_deg,
        );
        let asr = self.crossing(asr_dep, guess.asr, false).map_err(|_| {
            PrayerError::Computation(format!(
                "the sun never reaches the Asr shadow length at latitude {:.4}",
                self.latitude_deg
            ))
        })?;

        let fajr = self
            .crossing(
                self.params.fajr_angle_deg,
                guess.fajr.unwrap_or(5.0),
                true,
            )
            .ok();
        let isha = self.params.isha_angle_deg().and_then(|angle| {
            self.crossing(angle, guess.isha.unwrap_or(18.0), false).ok()
        });

        Ok(SolarDayHours {
            fajr,
            sunrise,
            dhuhr,
            asr,
            sunset,
            isha,
        })
    }
}

/// Solve the day and convert to local clock hours.
fn local_day_hours(req: &PrayerRequest) -> Result<LocalDayHours, PrayerError> {
    let solver = DaySolver::new(req);
    let mut solar = INITIAL_GUESS;
    for _ in 0..REFINEMENT_PASSES {
        solar = solver.solve_pass(&solar)?;
    }

    let shift = offset_hours(req.utc_offset) - req.coordinates.longitude() / 15.0;
    let sunrise = solar.sunrise + shift;
    let sunset = solar.sunset + shift;
    // Same-date sunrise and sunset; see the high_latitude module docs.
    let night = (sunrise - sunset).rem_euclid(24.0);

    let params = solver.params;
    let rule = req.high_latitude_rule;
    let mut adjustment = HighLatitudeAdjustment::default();

    let fajr_gap = rule.night_fraction(params.fajr_angle_deg) * night;
    let (fajr, fajr_bounded) =
        bound_twilight(solar.fajr.map(|h| h + shift), sunrise, fajr_gap, Twilight::Dawn);
    adjustment.fajr = fajr_bounded;

    let maghrib = sunset + MAGHRIB_SAFETY_MINUTES / 60.0;

    let isha = match params.isha_interval_minutes(req.fasting_month) {
        Some(minutes) => maghrib + minutes / 60.0,
        None => {
            let angle = params.isha_angle_deg().unwrap_or(params.fajr_angle_deg);
            let isha_gap = rule.night_fraction(angle) * night;
            let (isha, isha_bounded) =
                bound_twilight(solar.isha.map(|h| h + shift), sunset, isha_gap, Twilight::Dusk);
            adjustment.isha = isha_bounded;
            isha
        }
    };

    if adjustment.any() {
        debug!(
            "high-latitude rule {} applied on {} at latitude {:.4} (fajr: {}, isha: {})",
            rule, req.date, req.coordinates.latitude(), adjustment.fajr, adjustment.isha
        );
    }

    Ok(LocalDayHours {
        fajr,
        sunrise,
        dhuhr: solar.dhuhr + shift,
        asr: solar.asr + shift,
        sunset,
        maghrib,
        isha,
        adjustment,
    })
}

/// The five prayer entries for a day, overrides applied.
///
/// Entries are always complete and in the order Fajr, Dhuhr, Asr,
/// Maghrib, Isha. A failed evaluation yields an error and no entries.
pub fn compute_daily_times(req: &PrayerRequest) -> Result<[PrayerTimeEntry; 5], PrayerError> {
    let hours = local_day_hours(req)?;
    let computed = Prayer::ALL.map(|prayer| ClockTime::from_hours(hours.prayer(prayer)));
    debug!(
        "computed {} times for {} at ({:.4}, {:.4})",
        req.method, req.date, req.coordinates.latitude(), req.coordinates.longitude()
    );

    let mut entries = Vec::with_capacity(Prayer::ALL.len());
    for (prayer, time) in Prayer::ALL.into_iter().zip(computed) {
        let time = time?;
        entries.push(match req.custom_times.get(prayer) {
            Some(custom) => PrayerTimeEntry::custom(prayer, custom),
            None => PrayerTimeEntry::computed(prayer, time),
        });
    }
    entries
        .try_into()
        .map_err(|_| PrayerError::Computation("incomplete prayer list".to_string()))
}

/// The full solar day, including sunrise, sunset and the night markers.
///
/// The night runs from Maghrib to the next day's Fajr. If the next day
/// cannot be solved, today's Fajr stands in for it.
pub fn compute_schedule(req: &PrayerRequest) -> Result<DailySchedule, PrayerError> {
    let today = local_day_hours(req)?;
    let next_fajr = match req.date.succ_opt() {
        Some(next) => match local_day_hours(&req.for_date(next)) {
            Ok(tomorrow) => tomorrow.fajr,
            Err(e) => {
                debug!("next day unavailable ({e}), using today's fajr for night length");
                today.fajr
            }
        },
        None => today.fajr,
    };
    let night = (next_fajr - today.maghrib).rem_euclid(24.0);

    Ok(DailySchedule {
        date: req.date,
        coordinates: req.coordinates,
        method: req.method,
        madhab: req.madhab,
        utc_offset_seconds: req.utc_offset.local_minus_utc(),
        fajr: ClockTime::from_hours(today.fajr)?,
        sunrise: ClockTime::from_hours(today.sunrise)?,
        dhuhr: ClockTime::from_hours(today.dhuhr)?,
        asr: ClockTime::from_hours(today.asr)?,
        sunset: ClockTime::from_hours(today.sunset)?,
        maghrib: ClockTime::from_hours(today.maghrib)?,
        isha: ClockTime::from_hours(today.isha)?,
        middle_of_the_night: ClockTime::from_hours(today.maghrib + night / 2.0)?,
        last_third_of_the_night: ClockTime::from_hours(today.maghrib + night * 2.0 / 3.0)?,
        high_latitude: today.adjustment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::GeoCoordinate;
    use crate::high_latitude::HighLatitudeRule;
    use crate::method::CalculationMethod;
    use chrono::{FixedOffset, NaiveDate};

    fn request(lat: f64, lon: f64, y: i32, m: u32, d: u32, offset_h: i32) -> PrayerRequest {
        PrayerRequest::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            GeoCoordinate::new(lat, lon).unwrap(),
            FixedOffset::east_opt(offset_h * 3600).unwrap(),
        )
    }

    #[test]
    fn second_pass_moves_times_little() {
        let req = request(21.4225, 39.8262, 2024, 3, 20, 3);
        let solver = DaySolver::new(&req);
        let first = solver.solve_pass(&INITIAL_GUESS).unwrap();
        let second = solver.solve_pass(&first).unwrap();
        assert!((first.sunrise - second.sunrise).abs() < 2.0 / 60.0);
        assert!((first.dhuhr - second.dhuhr).abs() < 1.0 / 60.0);
        assert!((first.sunset - second.sunset).abs() < 2.0 / 60.0);
    }

    #[test]
    fn maghrib_is_sunset_plus_margin() {
        let req = request(30.0444, 31.2357, 2024, 6, 21, 3);
        let h = local_day_hours(&req).unwrap();
        assert!((h.maghrib - h.sunset - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn fasting_month_lengthens_umm_al_qura_isha() {
        let req = request(21.4225, 39.8262, 2024, 3, 20, 3).with_method(CalculationMethod::Makkah);
        let normal = local_day_hours(&req).unwrap();
        let fasting = local_day_hours(&req.clone().with_fasting_month(true)).unwrap();
        assert!((normal.isha - normal.maghrib - 1.5).abs() < 1e-12);
        assert!((fasting.isha - fasting.maghrib - 2.0).abs() < 1e-12);
    }

    #[test]
    fn fasting_flag_ignored_by_angle_methods() {
        let req = request(21.4225, 39.8262, 2024, 3, 20, 3);
        let a = compute_daily_times(&req).unwrap();
        let b = compute_daily_times(&req.clone().with_fasting_month(true)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn night_length_uses_same_date_sunrise() {
        let req = request(51.5074, -0.1278, 2024, 6, 21, 1)
            .with_high_latitude_rule(HighLatitudeRule::SeventhOfTheNight);
        let h = local_day_hours(&req).unwrap();
        let night = (h.sunrise - h.sunset).rem_euclid(24.0);
        assert!((h.sunrise - h.fajr - night / 7.0).abs() < 1e-9);
        assert!((h.isha - h.sunset - night / 7.0).abs() < 1e-9);
        assert!(h.adjustment.fajr && h.adjustment.isha);
    }

    #[test]
    fn polar_night_is_an_error() {
        let req = request(78.2232, 15.6267, 2024, 12, 21, 1);
        assert_eq!(
            compute_daily_times(&req),
            Err(PrayerError::NeverRises { latitude_deg: 78.2232 })
        );
    }

    #[test]
    fn midnight_sun_is_an_error() {
        let req = request(78.2232, 15.6267, 2024, 6, 21, 2);
        assert_eq!(
            compute_schedule(&req).unwrap_err(),
            PrayerError::NeverSets { latitude_deg: 78.2232 }
        );
    }
}
