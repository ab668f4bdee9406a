//! Delivery range checking.
//!
//! Decides whether a reported position lies within a fixed radius of a
//! reference point, using the haversine great-circle distance.

pub mod config;
pub mod geo;
pub mod location;
pub mod range;
pub mod server;

pub use config::DeliveryConfig;
pub use geo::{distance, GeoPoint};
pub use range::{is_within_range, RangeChecker, RangeQuery, RangeResult};
