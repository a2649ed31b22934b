//! Wall-clock sources for the ticker.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, Utc};

/// Source of the current local time of day.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveTime;
}

/// The host's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Wall clock at a fixed UTC offset, independent of the host zone.
///
/// Use the same offset the prayer times were computed for so that "now"
/// and the schedule agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetClock {
    offset: FixedOffset,
}

impl OffsetClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Time of day at `utc` in this offset.
    pub fn time_at(&self, utc: DateTime<Utc>) -> NaiveTime {
        utc.with_timezone(&self.offset).time()
    }

    /// Calendar date at `utc` in this offset.
    pub fn date_at(&self, utc: DateTime<Utc>) -> NaiveDate {
        utc.with_timezone(&self.offset).date_naive()
    }

    /// Today's date in this offset.
    pub fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }
}

impl Clock for OffsetClock {
    fn now(&self) -> NaiveTime {
        self.time_at(Utc::now())
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    time: Arc<Mutex<NaiveTime>>,
}

impl ManualClock {
    pub fn new(time: NaiveTime) -> Self {
        Self {
            time: Arc::new(Mutex::new(time)),
        }
    }

    pub fn set(&self, time: NaiveTime) {
        *self.time.lock().unwrap_or_else(PoisonError::into_inner) = time;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveTime {
        *self.time.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
