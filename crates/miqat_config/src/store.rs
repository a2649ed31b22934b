use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use anyhow::{Context, Result};
use log::{debug, warn};
use miqat_core::{Prayer, PrayerInputs, PrayerRequest};

/// Environment variable naming the preferences file.
pub const PREFERENCES_ENV: &str = "MIQAT_PREFERENCES";

/// Pick the preferences file: an explicit path wins over the environment.
pub fn preferences_path(explicit: Option<PathBuf>, env: Option<OsString>) -> Option<PathBuf> {
    explicit.or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
}

/// [`preferences_path`] reading [`PREFERENCES_ENV`] from the process.
pub fn preferences_path_from_env(explicit: Option<PathBuf>) -> Option<PathBuf> {
    preferences_path(explicit, std::env::var_os(PREFERENCES_ENV))
}

/// Saved prayer preferences, optionally backed by a JSON file.
pub struct PreferencesStore {
    path: Option<PathBuf>,
    data: RwLock<PrayerInputs>,
}

impl PreferencesStore {
    /// Load from `path`. A missing file yields defaults; so does a file that
    /// is not valid preferences JSON, with a warning.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("failed to read preferences from {}", path.display()))?;
            parse_or_default(&contents, &path)
        } else {
            debug!("no preferences at {}, using defaults", path.display());
            PrayerInputs::default()
        };
        Ok(Self {
            path: Some(path),
            data: RwLock::new(data),
        })
    }

    /// A store that never touches the filesystem.
    pub fn in_memory(inputs: PrayerInputs) -> Self {
        Self {
            path: None,
            data: RwLock::new(inputs),
        }
    }

    /// Open `path` if given, else an empty in-memory store.
    pub fn open_or_default(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(p) => Self::open(p),
            None => Ok(Self::in_memory(PrayerInputs::default())),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn inputs(&self) -> PrayerInputs {
        self.data.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Stored inputs with `overrides` layered on top, resolved.
    pub fn request(&self, overrides: &PrayerInputs) -> PrayerRequest {
        layer_inputs(&self.inputs(), overrides).resolve()
    }

    /// Apply `f` to the stored inputs and persist the result.
    pub fn update(&self, f: impl FnOnce(&mut PrayerInputs)) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
        self.persist(&guard)
    }

    /// Set or clear the override for one prayer.
    pub fn set_custom_time(&self, prayer: Prayer, time: Option<String>) -> Result<()> {
        self.update(|inputs| match time {
            Some(t) => inputs.custom_times.insert(prayer, t),
            None => {
                inputs.custom_times.remove(prayer);
            }
        })
    }

    /// Re-read the backing file, replacing the in-memory copy.
    pub fn reload(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read preferences from {}", path.display()))?;
        let data: PrayerInputs = serde_json::from_str(&contents)
            .with_context(|| format!("malformed preferences in {}", path.display()))?;
        *self.data.write().unwrap_or_else(PoisonError::into_inner) = data;
        Ok(())
    }

    fn persist(&self, data: &PrayerInputs) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(path, serialized)
            .with_context(|| format!("failed to write preferences to {}", path.display()))
    }
}

fn parse_or_default(contents: &str, path: &Path) -> PrayerInputs {
    match serde_json::from_str(contents) {
        Ok(inputs) => inputs,
        Err(e) => {
            warn!("ignoring malformed preferences in {}: {e}", path.display());
            PrayerInputs::default()
        }
    }
}

/// `overrides` on top of `stored`: every value set in `overrides` wins,
/// custom times merge per prayer, and the fasting flag is set if either
/// side sets it.
pub fn layer_inputs(stored: &PrayerInputs, overrides: &PrayerInputs) -> PrayerInputs {
    PrayerInputs {
        date: overrides.date.or(stored.date),
        latitude: overrides.latitude.or(stored.latitude),
        longitude: overrides.longitude.or(stored.longitude),
        calculation_method: overrides
            .calculation_method
            .clone()
            .or_else(|| stored.calculation_method.clone()),
        asr_method: overrides.asr_method.or(stored.asr_method),
        custom_times: stored.custom_times.merged_with(&overrides.custom_times),
        utc_offset: overrides
            .utc_offset
            .clone()
            .or_else(|| stored.utc_offset.clone()),
        high_latitude_rule: overrides.high_latitude_rule.or(stored.high_latitude_rule),
        fasting_month: overrides.fasting_month || stored.fasting_month,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miqat_core::CustomTimes;

    #[test]
    fn explicit_path_beats_env() {
        let p = preferences_path(Some("a.json".into()), Some("b.json".into()));
        assert_eq!(p, Some(PathBuf::from("a.json")));
        let p = preferences_path(None, Some("b.json".into()));
        assert_eq!(p, Some(PathBuf::from("b.json")));
        assert_eq!(preferences_path(None, Some(OsString::new())), None);
        assert_eq!(preferences_path(None, None), None);
    }

    #[test]
    fn overrides_win_field_by_field() {
        let stored = PrayerInputs {
            latitude: Some(21.4225),
            longitude: Some(39.8262),
            calculation_method: Some("Makkah".into()),
            asr_method: Some(0),
            custom_times: CustomTimes::new()
                .with(Prayer::Fajr, "05:10")
                .with(Prayer::Isha, "20:30"),
            ..Default::default()
        };
        let flags = PrayerInputs {
            calculation_method: Some("Egypt".into()),
            custom_times: CustomTimes::new().with(Prayer::Isha, "21:00"),
            fasting_month: true,
            ..Default::default()
        };
        let merged = layer_inputs(&stored, &flags);
        assert_eq!(merged.latitude, Some(21.4225));
        assert_eq!(merged.calculation_method.as_deref(), Some("Egypt"));
        assert_eq!(merged.asr_method, Some(0));
        assert_eq!(merged.custom_times.get(Prayer::Fajr), Some("05:10"));
        assert_eq!(merged.custom_times.get(Prayer::Isha), Some("21:00"));
        assert!(merged.fasting_month);
    }

    #[test]
    fn in_memory_update_needs_no_file() {
        let store = PreferencesStore::in_memory(PrayerInputs::default());
        store.set_custom_time(Prayer::Asr, Some("15:00".into())).unwrap();
        assert_eq!(store.inputs().custom_times.get(Prayer::Asr), Some("15:00"));
        store.set_custom_time(Prayer::Asr, None).unwrap();
        assert!(store.inputs().custom_times.is_empty());
        assert!(store.path().is_none());
        store.reload().unwrap();
    }
}
