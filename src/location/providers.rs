//! Geolocation providers: manual coordinates, IP lookup, and a stand-in for
//! environments with no geolocation capability.

use super::types::{GeolocationError, Position, PositionSource};
use crate::geo::GeoPoint;
use serde::Deserialize;

pub const IP_API_URL: &str = "https://ipapi.co/json/";

/// A capability that reports the caller's current position once per call.
pub trait GeolocationProvider {
    fn current_position(&self) -> Result<Position, GeolocationError>;
}

// ─── Manual ─────────────────────────────────────────────────────

/// Fixed coordinates supplied by the caller.
#[derive(Debug, Clone, Copy)]
pub struct ManualProvider {
    point: GeoPoint,
}

impl ManualProvider {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            point: GeoPoint::new(latitude, longitude),
        }
    }
}

impl GeolocationProvider for ManualProvider {
    fn current_position(&self) -> Result<Position, GeolocationError> {
        self.point
            .validate()
            .map_err(|e| GeolocationError::Unavailable(e.to_string()))?;
        Ok(Position::manual(self.point))
    }
}

// ─── Unsupported ────────────────────────────────────────────────

/// No geolocation capability at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedProvider;

impl GeolocationProvider for UnsupportedProvider {
    fn current_position(&self) -> Result<Position, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}

// ─── IP API ─────────────────────────────────────────────────────

#[derive(Deserialize)]
struct IpApiResult {
    latitude: Option<f64>,
    longitude: Option<f64>,
    city: Option<String>,
    country_name: Option<String>,
    #[serde(default)]
    error: Option<bool>,
    reason: Option<String>,
}

/// Approximate position from the caller's public IP address.
#[derive(Debug, Clone)]
pub struct IpProvider {
    url: String,
    agent: ureq::Agent,
}

impl IpProvider {
    pub fn new() -> Self {
        Self::with_url(IP_API_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(10))
            .build();
        Self {
            url: url.into(),
            agent,
        }
    }
}

impl Default for IpProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GeolocationProvider for IpProvider {
    fn current_position(&self) -> Result<Position, GeolocationError> {
        let response = self
            .agent
            .get(&self.url)
            .set("User-Agent", concat!("delivery-range/", env!("CARGO_PKG_VERSION")))
            .call()
            .map_err(classify_transport_error)?;

        let r: IpApiResult = response
            .into_json()
            .map_err(|e| GeolocationError::Unavailable(format!("invalid response: {}", e)))?;

        position_from_ip_result(r)
    }
}

fn classify_transport_error(err: ureq::Error) -> GeolocationError {
    match err {
        ureq::Error::Status(401 | 403, _) => GeolocationError::PermissionDenied,
        ureq::Error::Status(code, _) => {
            GeolocationError::Unavailable(format!("lookup service returned HTTP {}", code))
        }
        ureq::Error::Transport(t) => GeolocationError::Unavailable(t.to_string()),
    }
}

fn position_from_ip_result(r: IpApiResult) -> Result<Position, GeolocationError> {
    if r.error.unwrap_or(false) {
        let reason = r.reason.unwrap_or_else(|| "lookup failed".into());
        return Err(GeolocationError::Unavailable(reason));
    }

    let (lat, lon) = match (r.latitude, r.longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(GeolocationError::Unavailable("no coordinates in response".into())),
    };
    let point = GeoPoint::try_new(lat, lon)
        .map_err(|e| GeolocationError::Unavailable(e.to_string()))?;

    let label = match (r.city, r.country_name) {
        (Some(city), Some(country)) if !country.is_empty() => Some(format!("{}, {}", city, country)),
        (Some(city), _) => Some(city),
        (None, country) => country,
    };

    Ok(Position {
        point,
        source: PositionSource::IpApi,
        label,
    })
}
