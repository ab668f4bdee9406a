//! Core types for the geolocation subsystem.

use crate::geo::GeoPoint;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Where a position came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PositionSource {
    Manual,
    IpApi,
}

impl fmt::Display for PositionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "Manual"),
            Self::IpApi => write!(f, "IP"),
        }
    }
}

/// A position reported by a geolocation provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub point: GeoPoint,
    pub source: PositionSource,
    /// Human label from the provider (e.g. "Sylhet, Bangladesh")
    pub label: Option<String>,
}

impl Position {
    pub fn manual(point: GeoPoint) -> Self {
        Self {
            point,
            source: PositionSource::Manual,
            label: None,
        }
    }
}

/// Why a position could not be obtained.
///
/// The range check is never run when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum GeolocationError {
    #[error("Geolocation is not supported in this environment.")]
    Unsupported,
    #[error("Unable to retrieve location. Please allow location access.")]
    PermissionDenied,
    #[error("Unable to retrieve location: {0}")]
    Unavailable(String),
}
