use std::f64::consts::{PI, TAU};

use crate::error::{GlobeError, Result};

/// A named geographic coordinate rendered as a marker on the globe.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoPoint {
    /// Degrees, -90 (south) to 90 (north)
    pub latitude: f64,
    /// Degrees, -180 (west) to 180 (east)
    pub longitude: f64,
    pub label: String,
}

impl GeoPoint {
    /// Build a point, rejecting out-of-range or non-finite coordinates.
    pub fn new(latitude: f64, longitude: f64, label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        if !lat_ok || !lon_ok {
            return Err(GlobeError::InvalidCoordinate { label, latitude, longitude });
        }
        Ok(Self { latitude, longitude, label })
    }

    /// Const-friendly constructor for static lists that are valid by construction.
    pub(crate) fn known(latitude: f64, longitude: f64, label: &str) -> Self {
        debug_assert!((-90.0..=90.0).contains(&latitude));
        debug_assert!((-180.0..=180.0).contains(&longitude));
        Self { latitude, longitude, label: label.to_string() }
    }

    /// "48.9°N, 2.3°E" style readout.
    pub fn describe(&self) -> String {
        format_lat_lon(self.latitude, self.longitude)
    }
}

/// Format a coordinate pair with hemisphere letters.
pub fn format_lat_lon(lat: f64, lon: f64) -> String {
    format!(
        "{:.1}°{}, {:.1}°{}",
        lat.abs(),
        if lat >= 0.0 { "N" } else { "S" },
        lon.abs(),
        if lon >= 0.0 { "E" } else { "W" }
    )
}

/// Normalize an angle in radians into [-π, π).
#[inline(always)]
pub fn wrap_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(TAU) - PI
}
