//! Competitor locations for heatmap rendering.

use site_scout_geo_models::Coordinate;
use site_scout_market_models::Heatmap;
use site_scout_places::{PlacesError, PlacesProvider};
use site_scout_places_models::NearbyQuery;

/// Collects the coordinates of the first page of results for `query`,
/// centred on the query location.
///
/// # Errors
///
/// Returns the provider's error if the search fails.
pub async fn heatmap(
    places: &(impl PlacesProvider + ?Sized),
    query: &NearbyQuery,
) -> Result<Heatmap, PlacesError> {
    let page = places.nearby_page(query, None).await?;
    let coordinates: Vec<Coordinate> = page
        .results
        .iter()
        .map(|p| p.location.rounded())
        .collect();

    Ok(Heatmap {
        center: query.location.rounded(),
        count: coordinates.len(),
        coordinates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_scout_places::memory::MemoryPlaces;
    use site_scout_places_models::Place;

    #[tokio::test]
    async fn lists_competitor_coordinates() {
        let spot = |lat: f64| Place {
            place_id: lat.to_string(),
            name: "Gym".to_string(),
            location: Coordinate { lat, lng: 77.6 },
            rating: 0.0,
            user_ratings_total: 0,
            vicinity: None,
            types: Vec::new(),
        };
        let places = MemoryPlaces::new().with_pages(vec![vec![spot(12.91), spot(12.92)]]);
        let center = Coordinate { lat: 12.9, lng: 77.6 };

        let map = heatmap(&places, &NearbyQuery::keyword(center, 3000.0, "gym"))
            .await
            .unwrap();

        assert_eq!(map.center, center);
        assert_eq!(map.count, 2);
        assert_eq!(map.coordinates[1], Coordinate { lat: 12.92, lng: 77.6 });
    }

    #[tokio::test]
    async fn empty_area() {
        let center = Coordinate { lat: 0.0, lng: 0.0 };
        let map = heatmap(&MemoryPlaces::new(), &NearbyQuery::keyword(center, 100.0, "gym"))
            .await
            .unwrap();
        assert_eq!(map.count, 0);
        assert!(map.coordinates.is_empty());
    }
}
