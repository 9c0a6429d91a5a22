#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Low-saturation zone discovery.
//!
//! A square lattice is laid around the base location ([`grid`]), every
//! lattice point is probed for the number of nearby POIs of the requested
//! category ([`density`]), and the least crowded points are named and
//! returned ([`ranker`]). Individual probe and naming failures are
//! recovered and reported through [`ProbeStats`]; only an unresolvable base
//! location or an invalid lattice aborts the run.

pub mod density;
pub mod grid;
pub mod ranker;

use site_scout_config::GridConfig;
use site_scout_geo_models::{ProbeStats, ZoneSuggestions};
use site_scout_places::{Geocoder, PlacesError, PlacesProvider, resolve_base_location};
use thiserror::Error;

pub use grid::{GridError, generate_grid};

/// Errors that abort a zone suggestion run.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// Base location could not be resolved, or the input was invalid.
    #[error(transparent)]
    Places(#[from] PlacesError),

    /// The lattice parameters were rejected.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Suggests the least-saturated zones for `category` around `location_text`.
///
/// # Errors
///
/// * [`PlacesError::InvalidInput`] if `category` or `location_text` is blank
/// * [`PlacesError::NotFound`] or an upstream error if the base location
///   cannot be geocoded
/// * [`GridError`] if the configured radius and step are unusable
pub async fn suggest_zones<G, P>(
    geocoder: &G,
    places: &P,
    config: &GridConfig,
    location_text: &str,
    category: &str,
) -> Result<ZoneSuggestions, SpatialError>
where
    G: Geocoder + ?Sized,
    P: PlacesProvider + ?Sized,
{
    let category = category.trim();
    if category.is_empty() {
        return Err(PlacesError::invalid_input("category must not be empty").into());
    }

    let base_location = resolve_base_location(geocoder, location_text).await?;
    let lattice = generate_grid(base_location, config.radius_m, config.step_m)?;
    log::debug!(
        "Probing {} grid points around {base_location} for '{category}'",
        lattice.len()
    );

    let samples = density::survey(places, &lattice, category, config).await;
    let ranked = ranker::rank(geocoder, &samples, config.zone_count, config.probe_timeout()).await;

    let stats = ProbeStats {
        unresolved_names: ranked.unresolved_names,
        ..density::probe_stats(&samples)
    };
    if stats.failed > 0 {
        log::warn!(
            "{} of {} density probes failed; ranked the remaining {}",
            stats.failed,
            stats.attempted,
            stats.succeeded
        );
    }

    Ok(ZoneSuggestions {
        base_location: base_location.rounded(),
        category: category.to_string(),
        zones: ranked.zones,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_scout_geo_models::Coordinate;
    use site_scout_places::memory::MemoryPlaces;

    const BENGALURU: Coordinate = Coordinate {
        lat: 12.9,
        lng: 77.6,
    };

    /// Count grows with distance from the base. The three middle points of
    /// the southernmost row fail.
    fn counts(c: Coordinate) -> Result<u64, PlacesError> {
        let row = ((c.lat - BENGALURU.lat) * 1000.0).round();
        let col = ((c.lng - BENGALURU.lng) * 1000.0).round();
        if row < -10.0 && col.abs() < 10.0 {
            return Err(PlacesError::RateLimited);
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok((row.abs() + col.abs()) as u64)
    }

    #[tokio::test]
    async fn suggests_five_zones_despite_failed_probes() {
        let providers = MemoryPlaces::new()
            .with_geocode("Bengaluru", BENGALURU)
            .with_counts(counts)
            .with_place_name(BENGALURU, "MG Road, Bengaluru");

        let result = suggest_zones(
            &providers,
            &providers,
            &GridConfig::default(),
            "Bengaluru",
            "cafe",
        )
        .await
        .unwrap();

        assert_eq!(result.stats.attempted, 25);
        assert_eq!(result.stats.failed, 3);
        assert_eq!(result.stats.succeeded, 22);
        assert_eq!(result.zones.len(), 5);
        assert!(result.zones.windows(2).all(|w| w[0].count <= w[1].count));

        // The center has the lowest count and is the only named point.
        assert_eq!(result.zones[0].count, 0);
        assert_eq!(result.zones[0].name, "MG Road, Bengaluru");
        assert_eq!(result.stats.unresolved_names, 4);
    }

    #[tokio::test]
    async fn literal_coordinates_skip_geocoding() {
        let providers = MemoryPlaces::new().with_counts(|_| Ok(1));
        let result = suggest_zones(
            &providers,
            &providers,
            &GridConfig::default(),
            "12.9, 77.6",
            "gym",
        )
        .await
        .unwrap();

        assert_eq!(providers.geocode_calls(), 0);
        assert_eq!(result.base_location, BENGALURU);
        assert_eq!(result.zones.len(), 5);
    }

    #[tokio::test]
    async fn every_probe_failing_yields_no_zones() {
        let providers = MemoryPlaces::new().with_counts(|_| Err(PlacesError::RateLimited));
        let result = suggest_zones(
            &providers,
            &providers,
            &GridConfig::default(),
            "12.9,77.6",
            "gym",
        )
        .await
        .unwrap();

        assert!(result.zones.is_empty());
        assert_eq!(result.stats.failed, 25);
    }

    #[tokio::test]
    async fn blank_category_is_rejected() {
        let providers = MemoryPlaces::new();
        let err = suggest_zones(&providers, &providers, &GridConfig::default(), "12.9,77.6", " ")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SpatialError::Places(PlacesError::InvalidInput { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_location_is_fatal() {
        let providers = MemoryPlaces::new();
        let err = suggest_zones(
            &providers,
            &providers,
            &GridConfig::default(),
            "Atlantis",
            "cafe",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SpatialError::Places(PlacesError::NotFound { .. })));
    }

    #[tokio::test]
    async fn unaligned_grid_is_rejected() {
        let providers = MemoryPlaces::new();
        let config = GridConfig {
            radius_m: 1500.0,
            ..GridConfig::default()
        };
        let err = suggest_zones(&providers, &providers, &config, "12.9,77.6", "cafe")
            .await
            .unwrap_err();
        assert!(matches!(err, SpatialError::Grid(GridError::UnalignedRadius { .. })));
    }
}
