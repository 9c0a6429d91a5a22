//! Base location resolution.
//!
//! Every analysis starts from one base coordinate. Users may supply either
//! a literal `"lat,lng"` pair or free-form text such as a neighbourhood
//! name; only the latter costs a geocoding call.

use site_scout_geo_models::Coordinate;

use crate::{Geocoder, PlacesError};

/// Resolves user supplied location text to a coordinate.
///
/// # Errors
///
/// * [`PlacesError::InvalidInput`] if the text is blank or is a `"lat,lng"`
///   pair outside WGS84 bounds.
/// * [`PlacesError::NotFound`] if the geocoder matched nothing.
/// * Any geocoder error, unchanged.
pub async fn resolve_base_location(
    geocoder: &(impl Geocoder + ?Sized),
    text: &str,
) -> Result<Coordinate, PlacesError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(PlacesError::invalid_input("Location parameter is required"));
    }

    if let Some(coordinate) = parse_lat_lng(text)? {
        log::debug!("Using literal coordinate {coordinate}");
        return Ok(coordinate);
    }

    log::debug!("Geocoding base location '{text}'");
    geocoder
        .geocode(text)
        .await?
        .ok_or_else(|| PlacesError::NotFound {
            query: text.to_string(),
        })
}

/// Parses `"lat,lng"`. Returns `Ok(None)` when the text is not a numeric
/// pair (so it should be geocoded instead).
fn parse_lat_lng(text: &str) -> Result<Option<Coordinate>, PlacesError> {
    let Some((lat, lng)) = text.split_once(',') else {
        return Ok(None);
    };
    let (Ok(lat), Ok(lng)) = (lat.trim().parse::<f64>(), lng.trim().parse::<f64>()) else {
        return Ok(None);
    };

    Coordinate::new(lat, lng).map(Some).ok_or_else(|| {
        PlacesError::invalid_input(format!(
            "Coordinates out of range: {lat},{lng} (lat: [-90, 90], lng: [-180, 180])"
        ))
    })
}
