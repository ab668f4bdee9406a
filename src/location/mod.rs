//! Geolocation subsystem.
//!
//! Providers report the caller's position (or a classified failure), and
//! `LocationCheck` turns one provider call into one delivery decision.

pub mod check;
pub mod providers;
pub mod types;

pub use check::{CheckOutcome, CheckReport, CheckStatus, LocationCheck};
pub use providers::{GeolocationProvider, IpProvider, ManualProvider, UnsupportedProvider};
pub use types::{GeolocationError, Position, PositionSource};
