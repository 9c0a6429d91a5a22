//! Per-point POI density probes.
//!
//! Each grid point is probed independently through
//! [`PlacesProvider::nearby_count`]. A failed or timed-out probe is logged
//! and recorded as a sample without a count; it never aborts the survey.

use std::time::Duration;

use futures::stream::{self, StreamExt as _};
use site_scout_config::GridConfig;
use site_scout_geo_models::{Coordinate, DensitySample, ProbeStats};
use site_scout_places::{PlacesError, PlacesProvider};

/// Counts POIs of `category` within `probe_radius_m` of `coordinate`,
/// giving up after `timeout`.
///
/// # Errors
///
/// Returns [`PlacesError::Timeout`] if the provider does not answer in
/// time, or the provider's own error.
pub async fn estimate(
    places: &(impl PlacesProvider + ?Sized),
    coordinate: Coordinate,
    probe_radius_m: f64,
    category: &str,
    timeout: Duration,
) -> Result<u64, PlacesError> {
    tokio::time::timeout(
        timeout,
        places.nearby_count(coordinate, probe_radius_m, category),
    )
    .await
    .map_err(|_| PlacesError::Timeout {
        operation: format!("density probe at {coordinate}"),
    })?
}

/// Probes every grid point, up to `config.probe_concurrency` at a time.
///
/// Samples come back in grid order regardless of completion order, and the
/// call returns only after every probe has finished or timed out.
pub async fn survey(
    places: &(impl PlacesProvider + ?Sized),
    grid: &[Coordinate],
    category: &str,
    config: &GridConfig,
) -> Vec<DensitySample> {
    let timeout = config.probe_timeout();

    let samples: Vec<DensitySample> = stream::iter(grid.iter().copied().map(|coordinate| async move {
        let count = match estimate(places, coordinate, config.probe_radius_m, category, timeout).await
        {
            Ok(count) => Some(count),
            Err(e) => {
                log::warn!("Density probe failed at {coordinate}: {e}");
                None
            }
        };
        DensitySample { coordinate, count }
    }))
    .buffered(config.probe_concurrency.max(1))
    .collect()
    .await;

    let stats = probe_stats(&samples);
    log::info!(
        "Density survey complete: {}/{} probes succeeded",
        stats.succeeded,
        stats.attempted
    );
    samples
}

/// Tallies how many probes succeeded and failed.
#[must_use]
pub fn probe_stats(samples: &[DensitySample]) -> ProbeStats {
    let succeeded = samples.iter().filter(|s| s.count.is_some()).count();
    ProbeStats {
        attempted: samples.len(),
        succeeded,
        failed: samples.len() - succeeded,
        unresolved_names: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_scout_places::memory::MemoryPlaces;

    fn grid(n: usize) -> Vec<Coordinate> {
        (0..n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let lat = i as f64 * 0.01;
                Coordinate { lat, lng: 0.0 }
            })
            .collect()
    }

    #[tokio::test]
    async fn failed_probes_are_kept_without_count() {
        let places = MemoryPlaces::new().with_counts(|c| {
            if c.lat > 0.015 && c.lat < 0.025 {
                Err(PlacesError::RateLimited)
            } else {
                Ok(3)
            }
        });
        let samples = survey(&places, &grid(4), "cafe", &GridConfig::default()).await;

        assert_eq!(samples.len(), 4);
        assert_eq!(samples[2].count, None);
        assert_eq!(samples[3].count, Some(3));

        let stats = probe_stats(&samples);
        assert_eq!(stats.attempted, 4);
        assert_eq!(stats.succeeded, 3);
        assert_eq!(stats.failed, 1);
    }

    #[tokio::test]
    async fn samples_stay_in_grid_order() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let places = MemoryPlaces::new().with_counts(|c| Ok((c.lat * 100.0).round() as u64));
        let config = GridConfig {
            probe_concurrency: 3,
            ..GridConfig::default()
        };
        let points = grid(10);
        let samples = survey(&places, &points, "cafe", &config).await;

        for (i, sample) in samples.iter().enumerate() {
            assert_eq!(sample.coordinate, points[i]);
            assert_eq!(sample.count, Some(i as u64));
        }
    }

    #[tokio::test]
    async fn estimate_returns_count() {
        let places = MemoryPlaces::new().with_counts(|_| Ok(7));
        let count = estimate(
            &places,
            Coordinate { lat: 0.0, lng: 0.0 },
            500.0,
            "gym",
            Duration::from_secs(1),
        )
        .await
        .unwrap();
        assert_eq!(count, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_probe_is_recorded_without_count() {
        let points = grid(3);
        let places = MemoryPlaces::new()
            .with_counts(|_| Ok(1))
            .with_slow_count(points[1], Duration::from_secs(60));
        let config = GridConfig {
            probe_timeout_ms: 100,
            ..GridConfig::default()
        };

        let samples = survey(&places, &points, "cafe", &config).await;

        let counts: Vec<Option<u64>> = samples.iter().map(|s| s.count).collect();
        assert_eq!(counts, vec![Some(1), None, Some(1)]);
        assert_eq!(probe_stats(&samples).failed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn estimate_times_out() {
        let point = Coordinate { lat: 0.0, lng: 0.0 };
        let places = MemoryPlaces::new().with_slow_count(point, Duration::from_secs(60));
        let err = estimate(&places, point, 500.0, "cafe", Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, PlacesError::Timeout { .. }));
    }
}
