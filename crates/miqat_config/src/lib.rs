//! Saved prayer-time preferences.
//!
//! Preferences are a JSON object with the camelCase keys of
//! [`miqat_core::PrayerInputs`]:
//!
//! ```json
//! {
//!   "latitude": 21.4225,
//!   "longitude": 39.8262,
//!   "calculationMethod": "Makkah",
//!   "asrMethod": 0,
//!   "customTimes": { "fajr": "05:10" },
//!   "utcOffset": "+03:00",
//!   "highLatitudeRule": "angle-based"
//! }
//! ```
//!
//! Every key is optional. Values given on the command line are layered on
//! top with [`layer_inputs`].

mod store;

pub use store::{
    PREFERENCES_ENV, PreferencesStore, layer_inputs, preferences_path, preferences_path_from_env,
};
