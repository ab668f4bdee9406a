//! Geographic primitives: points, great-circle distance, and display helpers.
//!
//! All angles are in degrees at the API boundary and converted to radians
//! internally. Distances are in kilometers on a spherical Earth.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Coordinate validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("Coordinates must be finite numbers (got {lat}, {lon})")]
    NotFinite { lat: f64, lon: f64 },
    #[error("Latitude {0} out of range (-90 to 90)")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} out of range (-180 to 180)")]
    LongitudeOutOfRange(f64),
}

impl GeoPoint {
    /// Build a point without validation. Out-of-range values are accepted;
    /// distances computed from them are defined but meaningless.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build a point, rejecting non-finite or out-of-range coordinates.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let point = Self::new(latitude, longitude);
        point.validate()?;
        Ok(point)
    }

    pub fn validate(&self) -> Result<(), GeoError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(GeoError::NotFinite {
                lat: self.latitude,
                lon: self.longitude,
            });
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(GeoError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(GeoError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }

    /// Great-circle distance to another point, in kilometers.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        distance(*self, *other)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_coords(self.latitude, self.longitude))
    }
}

/// Haversine great-circle distance between two points, in kilometers.
///
/// Symmetric, non-negative, and zero for identical points. Total over all
/// finite inputs.
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = ((d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// The point reached from `origin` after travelling `distance_km` along a
/// great circle with initial bearing `bearing_deg` (clockwise from north).
///
/// Longitude is normalized to [-180, 180).
pub fn destination(origin: GeoPoint, bearing_deg: f64, distance_km: f64) -> GeoPoint {
    let delta = distance_km / EARTH_RADIUS_KM;
    let theta = bearing_deg.to_radians();
    let phi1 = origin.latitude.to_radians();
    let lambda1 = origin.longitude.to_radians();

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * sin_phi2);

    let lon = (lambda2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    GeoPoint::new(phi2.to_degrees(), lon)
}

/// Format coordinates as "24.9048°N, 91.8600°E".
pub fn format_coords(lat: f64, lon: f64) -> String {
    let ns = if lat >= 0.0 { 'N' } else { 'S' };
    let ew = if lon >= 0.0 { 'E' } else { 'W' };
    format!("{:.4}\u{00B0}{}, {:.4}\u{00B0}{}", lat.abs(), ns, lon.abs(), ew)
}
