//! Delivery configuration: the reference point and the serviceable radius.
//!
//! Read from `~/.delivery-range/config.json` (or `$DELIVERY_RANGE_CONFIG`).
//! A missing file yields the defaults; missing fields default individually.

use crate::geo::{GeoError, GeoPoint};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_RADIUS_KM: f64 = 9.0;
pub const DEFAULT_REFERENCE: GeoPoint = GeoPoint::new(24.9048, 91.86);

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "DELIVERY_RANGE_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default = "default_reference")]
    pub reference_point: GeoPoint,
    #[serde(default = "default_radius")]
    pub radius_km: f64,
}

fn default_reference() -> GeoPoint {
    DEFAULT_REFERENCE
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS_KM
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            reference_point: DEFAULT_REFERENCE,
            radius_km: DEFAULT_RADIUS_KM,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid radius {0} km: must be a finite, non-negative number")]
    InvalidRadius(f64),
    #[error("Invalid reference point: {0}")]
    InvalidReference(#[from] GeoError),
}

impl DeliveryConfig {
    pub fn new(reference_point: GeoPoint, radius_km: f64) -> Result<Self, ConfigError> {
        let config = Self { reference_point, radius_km };
        config.validate()?;
        Ok(config)
    }

    /// Load from `$DELIVERY_RANGE_CONFIG`, falling back to the default path.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_path);
        Self::load_from(&path)
    }

    /// Load from a specific path. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Self = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), radius_km = config.radius_km, "loaded config");
        Ok(config)
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".delivery-range")
            .join("config.json")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.radius_km.is_finite() || self.radius_km < 0.0 {
            return Err(ConfigError::InvalidRadius(self.radius_km));
        }
        self.reference_point.validate()?;
        Ok(())
    }

    /// Apply CLI-style overrides. The result is re-validated.
    pub fn with_overrides(
        self,
        radius_km: Option<f64>,
        ref_lat: Option<f64>,
        ref_lon: Option<f64>,
    ) -> Result<Self, ConfigError> {
        let reference_point = GeoPoint::new(
            ref_lat.unwrap_or(self.reference_point.latitude),
            ref_lon.unwrap_or(self.reference_point.longitude),
        );
        Self::new(reference_point, radius_km.unwrap_or(self.radius_km))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = DeliveryConfig::default();
        assert_eq!(config.radius_km, 9.0);
        assert_eq!(config.reference_point, GeoPoint::new(24.9048, 91.86));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = DeliveryConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, DeliveryConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "radius_km": 12.5 }"#).unwrap();

        let config = DeliveryConfig::load_from(&path).unwrap();
        assert_eq!(config.radius_km, 12.5);
        assert_eq!(config.reference_point, DEFAULT_REFERENCE);
    }

    #[test]
    fn test_full_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "reference_point": { "latitude": 59.3293, "longitude": 18.0686 },
                "radius_km": 5
            }"#,
        )
        .unwrap();

        let config = DeliveryConfig::load_from(&path).unwrap();
        assert_eq!(config.reference_point, GeoPoint::new(59.3293, 18.0686));
        assert_eq!(config.radius_km, 5.0);
    }

    // The only test touching CONFIG_ENV; both cases share it to avoid races.
    #[test]
    fn test_load_follows_env_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shop.json");
        fs::write(
            &path,
            r#"{
                "reference_point": { "latitude": 23.8103, "longitude": 90.4125 },
                "radius_km": 4.5
            }"#,
        )
        .unwrap();

        std::env::set_var(CONFIG_ENV, &path);
        let loaded = DeliveryConfig::load();

        std::env::set_var(CONFIG_ENV, dir.path().join("absent.json"));
        let fallback = DeliveryConfig::load();
        std::env::remove_var(CONFIG_ENV);

        let loaded = loaded.unwrap();
        assert_eq!(loaded.reference_point, GeoPoint::new(23.8103, 90.4125));
        assert_eq!(loaded.radius_km, 4.5);
        assert_eq!(fallback.unwrap(), DeliveryConfig::default());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(DeliveryConfig::load_from(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_negative_radius_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "radius_km": -1 }"#).unwrap();
        assert!(matches!(
            DeliveryConfig::load_from(&path),
            Err(ConfigError::InvalidRadius(r)) if r == -1.0
        ));
    }

    #[test]
    fn test_invalid_reference_rejected() {
        let err = DeliveryConfig::new(GeoPoint::new(95.0, 0.0), 9.0).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidReference(GeoError::LatitudeOutOfRange(_))));
    }

    #[test]
    fn test_overrides() {
        let config = DeliveryConfig::default()
            .with_overrides(Some(3.0), None, Some(90.0))
            .unwrap();
        assert_eq!(config.radius_km, 3.0);
        assert_eq!(config.reference_point, GeoPoint::new(24.9048, 90.0));

        assert!(DeliveryConfig::default()
            .with_overrides(Some(f64::INFINITY), None, None)
            .is_err());
    }
}
