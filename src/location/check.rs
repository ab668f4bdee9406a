//! Location check: one provider call, one range decision.
//!
//! Flow: provider → (position | failure) → range check → outcome.
//! A failed lookup never reaches the range checker.

use super::providers::GeolocationProvider;
use super::types::{GeolocationError, Position};
use crate::config::DeliveryConfig;
use crate::geo::GeoPoint;
use crate::range::{RangeChecker, RangeResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

pub const IN_RANGE_MESSAGE: &str = "\u{2705} You are within delivery range!";
pub const OUT_OF_RANGE_MESSAGE: &str = "\u{274C} You are outside our delivery range.";
pub const OUT_OF_RANGE_NOTICE: &str = "Your location is outside of our delivery range. \
    You can pick up your order directly from our restaurant. Thank you!";

/// Result of a single location check.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    InRange { position: Position, result: RangeResult },
    OutOfRange { position: Position, result: RangeResult },
    Unavailable(GeolocationError),
}

impl CheckOutcome {
    /// `None` when no position could be obtained.
    pub fn is_in_range(&self) -> Option<bool> {
        match self {
            Self::InRange { .. } => Some(true),
            Self::OutOfRange { .. } => Some(false),
            Self::Unavailable(_) => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::InRange { .. } => IN_RANGE_MESSAGE.to_string(),
            Self::OutOfRange { .. } => OUT_OF_RANGE_MESSAGE.to_string(),
            Self::Unavailable(e) => e.to_string(),
        }
    }

    /// Longer notice shown when the order cannot be delivered.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Self::OutOfRange { .. } => Some(OUT_OF_RANGE_NOTICE),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&RangeResult> {
        match self {
            Self::InRange { result, .. } | Self::OutOfRange { result, .. } => Some(result),
            Self::Unavailable(_) => None,
        }
    }

    pub fn position(&self) -> Option<&Position> {
        match self {
            Self::InRange { position, .. } | Self::OutOfRange { position, .. } => Some(position),
            Self::Unavailable(_) => None,
        }
    }
}

/// Runs location checks against one delivery configuration.
#[derive(Debug, Clone, Default)]
pub struct LocationCheck {
    checker: RangeChecker,
}

impl LocationCheck {
    pub fn new(checker: RangeChecker) -> Self {
        Self { checker }
    }

    pub fn from_config(config: DeliveryConfig) -> Self {
        Self::new(RangeChecker::new(config))
    }

    pub fn config(&self) -> &DeliveryConfig {
        self.checker.config()
    }

    /// Ask the provider once and decide. No retries.
    pub fn run(&self, provider: &dyn GeolocationProvider) -> CheckOutcome {
        match provider.current_position() {
            Ok(position) => self.decide(position),
            Err(e) => {
                warn!(error = %e, "location unavailable, range not checked");
                CheckOutcome::Unavailable(e)
            }
        }
    }

    /// Decide for an already obtained position.
    pub fn decide(&self, position: Position) -> CheckOutcome {
        let result = self.checker.check(position.point);
        info!(
            lat = position.point.latitude,
            lon = position.point.longitude,
            source = %position.source,
            distance_km = result.distance_km,
            within_range = result.within_range,
            "range checked"
        );
        if result.within_range {
            CheckOutcome::InRange { position, result }
        } else {
            CheckOutcome::OutOfRange { position, result }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    InRange,
    OutOfRange,
    Unavailable,
}

/// Serializable summary of a check, for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub status: CheckStatus,
    pub within_range: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub radius_km: f64,
    pub reference: GeoPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<GeolocationError>,
    pub checked_at: DateTime<Utc>,
}

impl CheckReport {
    pub fn from_outcome(outcome: &CheckOutcome, config: &DeliveryConfig) -> Self {
        let status = match outcome {
            CheckOutcome::InRange { .. } => CheckStatus::InRange,
            CheckOutcome::OutOfRange { .. } => CheckStatus::OutOfRange,
            CheckOutcome::Unavailable(_) => CheckStatus::Unavailable,
        };
        let position = outcome.position();
        Self {
            status,
            within_range: outcome.is_in_range(),
            distance_km: outcome.result().map(|r| r.distance_km),
            radius_km: config.radius_km,
            reference: config.reference_point,
            observed: position.map(|p| p.point),
            source: position.map(|p| p.source.to_string()),
            label: position.and_then(|p| p.label.clone()),
            message: outcome.message(),
            notice: outcome.notice().map(str::to_string),
            error: match outcome {
                CheckOutcome::Unavailable(e) => Some(e.clone()),
                _ => None,
            },
            checked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::providers::{ManualProvider, UnsupportedProvider};
    use std::cell::Cell;

    /// Counts calls so tests can assert a single attempt.
    struct CountingProvider {
        calls: Cell<u32>,
        result: Result<Position, GeolocationError>,
    }

    impl GeolocationProvider for CountingProvider {
        fn current_position(&self) -> Result<Position, GeolocationError> {
            self.calls.set(self.calls.get() + 1);
            self.result.clone()
        }
    }

    #[test]
    fn test_in_range() {
        let check = LocationCheck::default();
        let outcome = check.run(&ManualProvider::new(24.9048, 91.86));
        assert_eq!(outcome.is_in_range(), Some(true));
        assert_eq!(outcome.message(), IN_RANGE_MESSAGE);
        assert!(outcome.notice().is_none());
    }

    #[test]
    fn test_out_of_range() {
        let check = LocationCheck::default();
        let outcome = check.run(&ManualProvider::new(23.8103, 90.4125));
        assert_eq!(outcome.is_in_range(), Some(false));
        assert_eq!(outcome.message(), OUT_OF_RANGE_MESSAGE);
        assert_eq!(outcome.notice(), Some(OUT_OF_RANGE_NOTICE));
        assert!(outcome.result().unwrap().distance_km > 100.0);
    }

    #[test]
    fn test_unsupported_is_not_a_false_negative() {
        let outcome = LocationCheck::default().run(&UnsupportedProvider);
        assert_eq!(outcome, CheckOutcome::Unavailable(GeolocationError::Unsupported));
        assert_eq!(outcome.is_in_range(), None);
        assert!(outcome.result().is_none());
        assert_eq!(outcome.message(), "Geolocation is not supported in this environment.");
    }

    #[test]
    fn test_permission_denied_single_attempt() {
        let provider = CountingProvider {
            calls: Cell::new(0),
            result: Err(GeolocationError::PermissionDenied),
        };
        let outcome = LocationCheck::default().run(&provider);
        assert_eq!(provider.calls.get(), 1);
        assert_eq!(outcome, CheckOutcome::Unavailable(GeolocationError::PermissionDenied));
    }

    #[test]
    fn test_report_for_unavailable() {
        let config = DeliveryConfig::default();
        let outcome = CheckOutcome::Unavailable(GeolocationError::Unavailable("timeout".into()));
        let report = CheckReport::from_outcome(&outcome, &config);
        assert_eq!(report.status, CheckStatus::Unavailable);
        assert!(report.within_range.is_none());
        assert!(report.distance_km.is_none());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "unavailable");
        assert_eq!(json["error"]["kind"], "Unavailable");
        assert_eq!(json["error"]["detail"], "timeout");
        assert!(json.get("observed").is_none());
    }

    #[test]
    fn test_report_for_out_of_range() {
        let check = LocationCheck::default();
        let outcome = check.run(&ManualProvider::new(0.0, 0.0));
        let report = CheckReport::from_outcome(&outcome, check.config());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "out_of_range");
        assert_eq!(json["within_range"], false);
        assert_eq!(json["radius_km"], 9.0);
        assert_eq!(json["source"], "Manual");
        assert_eq!(json["notice"], OUT_OF_RANGE_NOTICE);
    }
}
