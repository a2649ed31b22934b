//! Observer coordinates and their fallback resolution.

use log::warn;
use serde::{Deserialize, Serialize};

/// Geographic location on Earth's surface.
///
/// Always in range: construction goes through [`GeoCoordinate::new`] or
/// [`GeoCoordinate::resolve`], and deserializing rejects out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for GeoCoordinate {
    type Error = String;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude).ok_or_else(|| {
            format!(
                "coordinates ({}, {}) out of range",
                raw.latitude, raw.longitude
            )
        })
    }
}

impl GeoCoordinate {
    /// Location used whenever the supplied coordinates are unusable.
    pub const LONDON: Self = Self {
        latitude: 51.5074,
        longitude: -0.1278,
    };

    /// Create a coordinate if both components are finite and in range.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        (lat_ok && lon_ok).then_some(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees, north positive. Range: [-90, 90].
    pub fn latitude(self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees, east positive. Range: [-180, 180].
    pub fn longitude(self) -> f64 {
        self.longitude
    }

    /// Resolve possibly-missing coordinates.
    ///
    /// If either component is missing or invalid, both are replaced by
    /// [`GeoCoordinate::LONDON`]. Never fails.
    pub fn resolve(latitude: Option<f64>, longitude: Option<f64>) -> Self {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon).unwrap_or_else(|| {
                warn!("coordinates ({lat}, {lon}) out of range, using default location");
                Self::LONDON
            }),
            _ => {
                warn!("coordinates missing, using default location");
                Self::LONDON
            }
        }
    }
}

impl Default for GeoCoordinate {
    fn default() -> Self {
        Self::LONDON
    }
}
