//! Delivery range decision.

use crate::config::DeliveryConfig;
use crate::geo::{self, GeoPoint};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeQuery {
    pub observed: GeoPoint,
    pub reference: GeoPoint,
    pub radius_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeResult {
    pub within_range: bool,
    pub distance_km: f64,
}

/// Distance from the reference point, compared inclusively against the radius.
pub fn is_within_range(query: &RangeQuery) -> RangeResult {
    let distance_km = geo::distance(query.observed, query.reference);
    RangeResult {
        within_range: distance_km <= query.radius_km,
        distance_km,
    }
}

/// A range checker bound to one delivery configuration.
#[derive(Debug, Clone)]
pub struct RangeChecker {
    config: DeliveryConfig,
}

impl RangeChecker {
    pub fn new(config: DeliveryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    pub fn query(&self, observed: GeoPoint) -> RangeQuery {
        RangeQuery {
            observed,
            reference: self.config.reference_point,
            radius_km: self.config.radius_km,
        }
    }

    pub fn check(&self, observed: GeoPoint) -> RangeResult {
        is_within_range(&self.query(observed))
    }
}

impl Default for RangeChecker {
    fn default() -> Self {
        Self::new(DeliveryConfig::default())
    }
}
