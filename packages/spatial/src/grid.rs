//! Deterministic coordinate lattice around a base point.
//!
//! Meter offsets are converted to degree offsets with a local flat-earth
//! approximation (spherical Earth, radius [`EARTH_RADIUS_M`]). This is
//! accurate to well under a percent at city scale (a few kilometers) and
//! degrades for large radii; it is not meant for geodesic work.

use std::f64::consts::PI;

use site_scout_geo_models::{Coordinate, EARTH_RADIUS_M};
use thiserror::Error;

/// Upper bound on lattice size. Every point costs one provider call.
pub const MAX_GRID_POINTS: usize = 10_000;

/// Relative slack when checking that the radius is a multiple of the step.
const ALIGNMENT_EPSILON: f64 = 1e-9;

/// Errors from grid generation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// The center coordinate is non-finite or out of range.
    #[error("Invalid grid center {0}")]
    InvalidCenter(Coordinate),

    /// The step is zero, negative, or non-finite.
    #[error("Grid step must be a positive number of meters, got {step_m}")]
    InvalidStep {
        /// The rejected step.
        step_m: f64,
    },

    /// The radius is negative or non-finite.
    #[error("Grid radius must be a non-negative number of meters, got {radius_m}")]
    InvalidRadius {
        /// The rejected radius.
        radius_m: f64,
    },

    /// The radius is not a whole multiple of the step, so a lattice
    /// through the center would not reach both edges.
    #[error("Grid radius {radius_m} m is not a whole multiple of step {step_m} m")]
    UnalignedRadius {
        /// Requested radius.
        radius_m: f64,
        /// Requested step.
        step_m: f64,
    },

    /// Longitude offsets are undefined at a pole (cos(lat) = 0).
    #[error("Cannot build a grid centred on a pole (lat {lat})")]
    PolarCenter {
        /// Center latitude.
        lat: f64,
    },

    /// The lattice reaches past ±90° latitude.
    #[error("Grid of radius {radius_m} m around {center} crosses a pole")]
    CrossesPole {
        /// Grid center.
        center: Coordinate,
        /// Requested radius.
        radius_m: f64,
    },

    /// The lattice would exceed [`MAX_GRID_POINTS`].
    #[error("Grid would contain {points} points (max {MAX_GRID_POINTS})")]
    TooManyPoints {
        /// Requested lattice size.
        points: usize,
    },
}

/// Generates the sampling lattice around `center`.
///
/// Offsets `dlat` and `dlng` each run from `-radius_m` to `+radius_m`
/// inclusive in increments of `step_m`, giving `(⌊2·radius/step⌋ + 1)²`
/// points in row-major order (latitude offset outer, longitude offset
/// inner). The exact `center` is always one of them, at offset `(0, 0)`.
///
/// The radius must be a whole multiple of the step (within floating point
/// slack) so that the lattice is both symmetric about the center and
/// touches both edges. A zero radius yields the single center point.
///
/// # Errors
///
/// Returns [`GridError`] for invalid inputs, a polar center, a lattice
/// that crosses a pole, or one larger than [`MAX_GRID_POINTS`].
pub fn generate_grid(
    center: Coordinate,
    radius_m: f64,
    step_m: f64,
) -> Result<Vec<Coordinate>, GridError> {
    if !center.is_valid() {
        return Err(GridError::InvalidCenter(center));
    }
    if !step_m.is_finite() || step_m <= 0.0 {
        return Err(GridError::InvalidStep { step_m });
    }
    if !radius_m.is_finite() || radius_m < 0.0 {
        return Err(GridError::InvalidRadius { radius_m });
    }
    if center.lat.abs() >= 90.0 {
        return Err(GridError::PolarCenter { lat: center.lat });
    }

    let ratio = radius_m / step_m;
    let half_steps = ratio.round();
    if (ratio - half_steps).abs() > ALIGNMENT_EPSILON * ratio.max(1.0) {
        return Err(GridError::UnalignedRadius { radius_m, step_m });
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let half_steps = half_steps as usize;
    let side = 2 * half_steps + 1;
    let points = side.saturating_mul(side);
    if points > MAX_GRID_POINTS {
        return Err(GridError::TooManyPoints { points });
    }

    let max_dlat = meters_to_lat_degrees(radius_m);
    if center.lat + max_dlat > 90.0 || center.lat - max_dlat < -90.0 {
        return Err(GridError::CrossesPole { center, radius_m });
    }

    let cos_lat = (center.lat * PI / 180.0).cos();
    let offsets: Vec<f64> = (0..side)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let k = i as f64 - half_steps as f64;
            k * step_m
        })
        .collect();

    let mut grid = Vec::with_capacity(points);
    for &dlat in &offsets {
        for &dlng in &offsets {
            grid.push(Coordinate {
                lat: center.lat + meters_to_lat_degrees(dlat),
                lng: wrap_longitude(center.lng + meters_to_lat_degrees(dlng) / cos_lat),
            });
        }
    }

    log::debug!(
        "Generated {points}-point grid around {center} (radius {radius_m} m, step {step_m} m)"
    );
    Ok(grid)
}

/// `Δlat_deg = (d / R) · (180 / π)`.
#[inline]
fn meters_to_lat_degrees(meters: f64) -> f64 {
    (meters / EARTH_RADIUS_M) * (180.0 / PI)
}

/// Folds a longitude that ran past the antimeridian back into range.
#[inline]
fn wrap_longitude(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        lng
    } else {
        (lng + 180.0).rem_euclid(360.0) - 180.0
    }
}
