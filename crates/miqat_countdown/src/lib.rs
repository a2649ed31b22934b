//! Live "time until next prayer" countdown.
//!
//! ```rust,no_run
//! # async fn demo(entries: Vec<miqat_core::PrayerTimeEntry>) {
//! let mut sub = miqat_countdown::subscribe_next_prayer(entries);
//! while let Some(state) = sub.changed().await {
//!     println!("{} in {}", state.name, state.time_remaining);
//! }
//! # }
//! ```

pub mod clock;
pub mod ticker;

pub use clock::{Clock, ManualClock, OffsetClock, SystemClock};
pub use ticker::{NextPrayerSubscription, NextPrayerTicker, TICK_INTERVAL, subscribe_next_prayer};
