//! Engine inputs: raw preference values and their resolved form.

use chrono::{FixedOffset, Local, NaiveDate, Utc};
use log::warn;
use miqat_time::{local_offset_on, parse_utc_offset};
use serde::{Deserialize, Serialize};

use crate::high_latitude::HighLatitudeRule;
use crate::location::GeoCoordinate;
use crate::madhab::Madhab;
use crate::method::CalculationMethod;
use crate::prayer_types::CustomTimes;

/// Fully resolved inputs for one day's computation.
#[derive(Debug, Clone, PartialEq)]
pub struct PrayerRequest {
    pub date: NaiveDate,
    pub coordinates: GeoCoordinate,
    pub method: CalculationMethod,
    pub madhab: Madhab,
    pub custom_times: CustomTimes,
    /// Offset converting UTC to the local wall clock.
    pub utc_offset: FixedOffset,
    pub high_latitude_rule: HighLatitudeRule,
    /// Set by the caller's Hijri calendar during the fasting month.
    pub fasting_month: bool,
}

impl PrayerRequest {
    /// Request with default method, madhab and rule and no overrides.
    pub fn new(date: NaiveDate, coordinates: GeoCoordinate, utc_offset: FixedOffset) -> Self {
        Self {
            date,
            coordinates,
            method: CalculationMethod::default(),
            madhab: Madhab::default(),
            custom_times: CustomTimes::default(),
            utc_offset,
            high_latitude_rule: HighLatitudeRule::default(),
            fasting_month: false,
        }
    }

    pub fn with_method(mut self, method: CalculationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_madhab(mut self, madhab: Madhab) -> Self {
        self.madhab = madhab;
        self
    }

    pub fn with_custom_times(mut self, custom_times: CustomTimes) -> Self {
        self.custom_times = custom_times;
        self
    }

    pub fn with_high_latitude_rule(mut self, rule: HighLatitudeRule) -> Self {
        self.high_latitude_rule = rule;
        self
    }

    pub fn with_fasting_month(mut self, fasting_month: bool) -> Self {
        self.fasting_month = fasting_month;
        self
    }

    /// Same request for another date.
    pub fn for_date(&self, date: NaiveDate) -> Self {
        Self {
            date,
            ..self.clone()
        }
    }
}

/// Unvalidated inputs as a collaborator stores them.
///
/// Every field is optional; [`PrayerInputs::resolve`] substitutes defaults
/// and never fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrayerInputs {
    pub date: Option<NaiveDate>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub calculation_method: Option<String>,
    /// 0 = standard, 1 = Hanafi.
    pub asr_method: Option<i64>,
    pub custom_times: CustomTimes,
    /// `±HH:MM` or decimal hours; host offset when absent.
    pub utc_offset: Option<String>,
    pub high_latitude_rule: Option<HighLatitudeRule>,
    pub fasting_month: bool,
}

impl PrayerInputs {
    /// Resolve to engine inputs.
    ///
    /// - missing date → today in the given offset, or the host's today
    /// - missing/invalid coordinates → London
    /// - unknown method → Muslim World League
    /// - invalid offset → host offset on that date
    pub fn resolve(&self) -> PrayerRequest {
        let explicit = self.utc_offset.as_deref().and_then(|s| {
            parse_utc_offset(s)
                .inspect_err(|e| warn!("{e}, using host offset"))
                .ok()
        });
        let date = self.date.unwrap_or_else(|| match explicit {
            Some(offset) => Utc::now().with_timezone(&offset).date_naive(),
            None => Local::now().date_naive(),
        });
        let utc_offset = explicit.unwrap_or_else(|| local_offset_on(date));
        PrayerRequest {
            date,
            coordinates: GeoCoordinate::resolve(self.latitude, self.longitude),
            method: CalculationMethod::resolve(self.calculation_method.as_deref()),
            madhab: Madhab::from_asr_method(self.asr_method),
            custom_times: self.custom_times.clone(),
            utc_offset,
            high_latitude_rule: self.high_latitude_rule.unwrap_or_default(),
            fasting_month: self.fasting_month,
        }
    }
}
