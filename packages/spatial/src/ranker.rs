//! Least-saturated zone selection and naming.

use std::time::Duration;

use futures::future::join_all;
use site_scout_geo_models::{Coordinate, DensitySample, UNKNOWN_AREA, ZoneSuggestion};
use site_scout_places::Geocoder;

/// Picks the `k` successful samples with the lowest counts.
///
/// Samples without a count are excluded. The sort is stable, so equal
/// counts keep their grid order.
#[must_use]
pub fn least_saturated(samples: &[DensitySample], k: usize) -> Vec<(Coordinate, u64)> {
    let mut measured: Vec<(Coordinate, u64)> = samples
        .iter()
        .filter_map(|s| s.count.map(|count| (s.coordinate, count)))
        .collect();
    measured.sort_by_key(|&(_, count)| count);
    measured.truncate(k);
    measured
}

/// Chosen zones plus how many of them could not be named.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedZones {
    /// Lowest counts first.
    pub zones: Vec<ZoneSuggestion>,
    /// Zones whose lookup failed, timed out, or came back empty and were
    /// given the [`UNKNOWN_AREA`] fallback.
    pub unresolved_names: usize,
}

/// Ranks `samples` and attaches a human-readable name to each chosen zone.
///
/// Names are looked up concurrently; a failed, empty, or timed-out lookup
/// falls back to [`UNKNOWN_AREA`]. Coordinates are rounded to 6 decimals
/// only after ranking.
pub async fn rank(
    geocoder: &(impl Geocoder + ?Sized),
    samples: &[DensitySample],
    k: usize,
    timeout: Duration,
) -> RankedZones {
    let chosen = least_saturated(samples, k);

    let names = join_all(
        chosen
            .iter()
            .map(|&(coordinate, _)| zone_name(geocoder, coordinate, timeout)),
    )
    .await;

    let unresolved_names = names.iter().filter(|n| n.is_none()).count();
    let zones = chosen
        .into_iter()
        .zip(names)
        .map(|((coordinate, count), name)| ZoneSuggestion {
            coordinate: coordinate.rounded(),
            count,
            name: name.unwrap_or_else(|| UNKNOWN_AREA.to_string()),
        })
        .collect();

    RankedZones {
        zones,
        unresolved_names,
    }
}

async fn zone_name(
    geocoder: &(impl Geocoder + ?Sized),
    coordinate: Coordinate,
    timeout: Duration,
) -> Option<String> {
    match tokio::time::timeout(timeout, geocoder.reverse_geocode(coordinate)).await {
        Ok(Ok(Some(name))) if !name.trim().is_empty() => Some(name),
        Ok(Ok(_)) => None,
        Ok(Err(e)) => {
            log::warn!("Reverse geocode failed for {coordinate}: {e}");
            None
        }
        Err(_) => {
            log::warn!("Reverse geocode timed out for {coordinate}");
            None
        }
    }
}
