//! Footfall landmarks near a location.
//!
//! Hostels, schools, and apartment blocks are searched one kind at a time
//! and the first few names of each are kept. A kind whose search fails is
//! reported in [`Landmarks::failed`] without affecting the others.

use site_scout_geo_models::Coordinate;
use site_scout_market_models::{LandmarkGroup, Landmarks};
use site_scout_places::PlacesProvider;
use site_scout_places_models::NearbyQuery;

/// Landmark label and the provider place type searched for it.
pub const LANDMARK_KINDS: [(&str, &str); 3] = [
    ("hostels", "lodging"),
    ("schools", "school"),
    ("apartments", "apartment"),
];

/// Names kept per landmark kind.
pub const NAMES_PER_KIND: usize = 5;

/// Searches every landmark kind within `radius_m` of `center`.
///
/// Only the first result page of each kind is read.
pub async fn collect(
    places: &(impl PlacesProvider + ?Sized),
    center: Coordinate,
    radius_m: f64,
) -> Landmarks {
    let mut groups = Vec::with_capacity(LANDMARK_KINDS.len());
    let mut failed = Vec::new();

    for (kind, place_type) in LANDMARK_KINDS {
        let query = NearbyQuery::place_type(center, radius_m, place_type);
        match places.nearby_page(&query, None).await {
            Ok(page) => groups.push(LandmarkGroup {
                kind: kind.to_owned(),
                place_type: place_type.to_owned(),
                names: page
                    .results
                    .into_iter()
                    .take(NAMES_PER_KIND)
                    .map(|p| p.name)
                    .collect(),
            }),
            Err(e) => {
                log::warn!("Landmark search for {kind} around {center} failed: {e}");
                failed.push(kind.to_owned());
            }
        }
    }

    Landmarks {
        center: center.rounded(),
        groups,
        failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_scout_places::memory::MemoryPlaces;
    use site_scout_places_models::Place;

    const CENTER: Coordinate = Coordinate {
        lat: 12.9716,
        lng: 77.5946,
    };

    fn named(names: &[&str]) -> Vec<Place> {
        names
            .iter()
            .map(|name| Place {
                place_id: format!("id-{name}"),
                name: (*name).to_string(),
                location: CENTER,
                rating: 0.0,
                user_ratings_total: 0,
                vicinity: None,
                types: Vec::new(),
            })
            .collect()
    }

    #[tokio::test]
    async fn keeps_first_five_names_per_kind() {
        let places = MemoryPlaces::new()
            .with_type_results("lodging", named(&["H1", "H2", "H3", "H4", "H5", "H6", "H7"]))
            .with_type_results("school", named(&["Greenwood High"]))
            .with_type_results("apartment", Vec::new());

        let landmarks = collect(&places, CENTER, 3000.0).await;

        let kinds: Vec<&str> = landmarks.groups.iter().map(|g| g.kind.as_str()).collect();
        assert_eq!(kinds, vec!["hostels", "schools", "apartments"]);
        assert_eq!(
            landmarks.names("hostels").unwrap(),
            ["H1", "H2", "H3", "H4", "H5"].map(String::from)
        );
        assert_eq!(landmarks.names("schools").unwrap(), ["Greenwood High".to_string()]);
        assert!(landmarks.names("apartments").unwrap().is_empty());
        assert!(landmarks.failed.is_empty());
        assert_eq!(places.page_requests(), vec![None, None, None]);
    }

    #[tokio::test]
    async fn failed_kind_does_not_hide_others() {
        let places = MemoryPlaces::new()
            .with_type_results("lodging", named(&["Zostel"]))
            .with_failing_type("school")
            .with_type_results("apartment", named(&["Prestige Towers"]));

        let landmarks = collect(&places, CENTER, 3000.0).await;

        assert_eq!(landmarks.failed, vec!["schools".to_string()]);
        assert!(landmarks.names("schools").is_none());
        assert_eq!(landmarks.names("hostels").unwrap(), ["Zostel".to_string()]);
        assert_eq!(
            landmarks.names("apartments").unwrap(),
            ["Prestige Towers".to_string()]
        );
    }
}
