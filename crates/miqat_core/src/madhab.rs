//! Juristic school selection for the Asr shadow ratio.

use serde::{Deserialize, Serialize};

/// Juristic school. Only affects Asr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Madhab {
    /// Shafi'i, Maliki, Hanbali: shadow equals object height.
    Standard,
    /// Hanafi: shadow equals twice the object height.
    #[default]
    Hanafi,
}

impl Madhab {
    /// Shadow length as a multiple of object height.
    pub fn shadow_ratio(self) -> f64 {
        match self {
            Self::Standard => 1.0,
            Self::Hanafi => 2.0,
        }
    }

    /// Map the numeric `asrMethod` preference: 0 is standard, 1 is Hanafi.
    /// Missing or unrecognised values use the default.
    pub fn from_asr_method(code: Option<i64>) -> Self {
        match code {
            Some(0) => Self::Standard,
            Some(1) => Self::Hanafi,
            _ => Self::default(),
        }
    }

    /// Numeric `asrMethod` code.
    pub fn asr_method(self) -> i64 {
        match self {
            Self::Standard => 0,
            Self::Hanafi => 1,
        }
    }
}
