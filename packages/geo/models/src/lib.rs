#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic value types shared by the spatial opportunity engine.
//!
//! Everything here is a plain, request-scoped value: coordinates, density
//! probe results, and the ranked zone suggestions handed to callers.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters used by the local flat-earth approximation.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Fallback name used when a zone cannot be reverse geocoded.
pub const UNKNOWN_AREA: &str = "Unknown area";

/// A WGS84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees, `[-90, 90]`.
    pub lat: f64,
    /// Longitude in decimal degrees, `[-180, 180]`.
    pub lng: f64,
}

impl Coordinate {
    /// Creates a coordinate, returning `None` when either component is
    /// non-finite or out of range.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let coordinate = Self { lat, lng };
        coordinate.is_valid().then_some(coordinate)
    }

    /// Whether both components are finite and within WGS84 bounds.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Returns a copy rounded to six decimal places (~0.11 m).
    ///
    /// Presentation only: ranking always happens on unrounded values.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            lat: round6(self.lat),
            lng: round6(self.lng),
        }
    }

    /// Formats as `"lat,lng"`, the form most place APIs accept.
    #[must_use]
    pub fn to_query_param(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

#[inline]
fn round6(v: f64) -> f64 {
    (v * 1_000_000.0).round() / 1_000_000.0
}

/// Outcome of probing the POI count around one grid point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensitySample {
    /// The probed grid point.
    pub coordinate: Coordinate,
    /// POI count, or `None` when the probe failed or timed out.
    pub count: Option<u64>,
}

/// A low-density zone recommended for a new business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSuggestion {
    /// Zone coordinate, rounded to six decimal places.
    pub coordinate: Coordinate,
    /// Number of matching POIs found around the zone.
    pub count: u64,
    /// Reverse geocoded place name, or [`UNKNOWN_AREA`].
    pub name: String,
}

/// Success/skip accounting for a batch of density probes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeStats {
    /// Grid points probed.
    pub attempted: usize,
    /// Probes that returned a count.
    pub succeeded: usize,
    /// Probes that failed or timed out and were excluded from ranking.
    pub failed: usize,
    /// Ranked zones whose name fell back to [`UNKNOWN_AREA`].
    pub unresolved_names: usize,
}

/// Result of a low-density zone search around a base location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSuggestions {
    /// Resolved base location the grid was centred on.
    pub base_location: Coordinate,
    /// Business category that was probed.
    pub category: String,
    /// Least dense zones first.
    pub zones: Vec<ZoneSuggestion>,
    /// How many probes and name lookups succeeded.
    pub stats: ProbeStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range() {
        assert!(Coordinate::new(90.5, 0.0).is_none());
        assert!(Coordinate::new(0.0, -180.1).is_none());
        assert!(Coordinate::new(f64::NAN, 0.0).is_none());
        assert!(Coordinate::new(-90.0, 180.0).is_some());
    }

    #[test]
    fn rounds_to_six_decimals() {
        let c = Coordinate {
            lat: 12.345_678_91,
            lng: -77.000_000_49,
        };
        let r = c.rounded();
        assert!((r.lat - 12.345_679).abs() < 1e-12);
        assert!((r.lng - -77.0).abs() < 1e-12);
    }

    #[test]
    fn serializes_as_lat_lng() {
        let json = serde_json::to_value(Coordinate { lat: 1.5, lng: 2.5 }).unwrap();
        assert_eq!(json, serde_json::json!({ "lat": 1.5, "lng": 2.5 }));
    }
}
