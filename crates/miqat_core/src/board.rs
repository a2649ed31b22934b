//! Last-good prayer times with the current error state.
//!
//! A failed recomputation records its message but keeps the previous
//! entries, so a display can keep showing the last known times.

use log::warn;

use crate::error::PrayerError;
use crate::prayer::compute_daily_times;
use crate::prayer_types::PrayerTimeEntry;
use crate::request::PrayerRequest;

#[derive(Debug, Clone, Default)]
pub struct PrayerBoard {
    entries: Option<[PrayerTimeEntry; 5]>,
    request: Option<PrayerRequest>,
    error: Option<String>,
}

impl PrayerBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute for `req`. On failure the previous entries stay in place.
    pub fn recompute(&mut self, req: &PrayerRequest) -> Result<&[PrayerTimeEntry; 5], PrayerError> {
        match compute_daily_times(req) {
            Ok(entries) => {
                self.error = None;
                self.request = Some(req.clone());
                let stored = self.entries.insert(entries);
                Ok(&*stored)
            }
            Err(e) => {
                warn!("keeping previous prayer times: {e}");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Latest successfully computed entries.
    pub fn entries(&self) -> Option<&[PrayerTimeEntry; 5]> {
        self.entries.as_ref()
    }

    /// Request behind [`PrayerBoard::entries`].
    pub fn request(&self) -> Option<&PrayerRequest> {
        self.request.as_ref()
    }

    /// Message of the most recent failure, cleared by the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the shown entries predate a failed recomputation.
    pub fn is_stale(&self) -> bool {
        self.error.is_some() && self.entries.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::GeoCoordinate;
    use chrono::{FixedOffset, NaiveDate};

    fn req(lat: f64, lon: f64) -> PrayerRequest {
        PrayerRequest::new(
            NaiveDate::from_ymd_opt(2024, 12, 21).unwrap(),
            GeoCoordinate::new(lat, lon).unwrap(),
            FixedOffset::east_opt(3600).unwrap(),
        )
    }

    #[test]
    fn starts_empty() {
        let b = PrayerBoard::new();
        assert!(b.entries().is_none());
        assert!(b.error().is_none());
        assert!(!b.is_stale());
    }

    #[test]
    fn failure_keeps_previous_entries() {
        let mut b = PrayerBoard::new();
        let good = b.recompute(&req(48.8566, 2.3522)).unwrap().clone();

        // Longyearbyen in polar night
        let err = b.recompute(&req(78.2232, 15.6267)).unwrap_err();
        assert!(matches!(err, PrayerError::NeverRises { .. }));
        assert_eq!(b.entries(), Some(&good));
        assert!(b.error().unwrap().contains("does not rise"));
        assert!(b.is_stale());
        assert_eq!(b.request().unwrap().coordinates.latitude(), 48.8566);
    }

    #[test]
    fn success_clears_error() {
        let mut b = PrayerBoard::new();
        let _ = b.recompute(&req(78.2232, 15.6267));
        assert!(b.error().is_some());
        assert!(b.entries().is_none());
        b.recompute(&req(48.8566, 2.3522)).unwrap();
        assert!(b.error().is_none());
        assert!(b.entries().is_some());
    }
}
