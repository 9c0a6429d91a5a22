//! Competitor statistics for a business category.

use site_scout_market_models::{Competitor, CompetitorInsights};
use site_scout_places::{PlacesError, PlacesProvider};
use site_scout_places_models::{NearbyQuery, Place};

/// Summarizes the first page of a keyword search for `category`.
///
/// # Errors
///
/// Returns the provider's error if the search fails.
pub async fn insights(
    places: &(impl PlacesProvider + ?Sized),
    query: &NearbyQuery,
    category: &str,
) -> Result<CompetitorInsights, PlacesError> {
    let page = places.nearby_page(query, None).await?;
    log::debug!(
        "Found {} competitor(s) for '{category}' around {}",
        page.results.len(),
        query.location
    );
    Ok(summarize(category, page.results))
}

/// Computes totals and averages over `competitors`.
#[must_use]
pub fn summarize(category: &str, competitors: Vec<Place>) -> CompetitorInsights {
    let total = competitors.len();
    #[allow(clippy::cast_precision_loss)]
    let (avg_rating, avg_reviews) = if total == 0 {
        (0.0, 0.0)
    } else {
        let n = total as f64;
        (
            round2(competitors.iter().map(|p| p.rating).sum::<f64>() / n),
            round2(
                competitors
                    .iter()
                    .map(|p| p.user_ratings_total as f64)
                    .sum::<f64>()
                    / n,
            ),
        )
    };

    CompetitorInsights {
        category: category.to_string(),
        total,
        avg_rating,
        avg_reviews,
        details: competitors
            .into_iter()
            .map(|place| Competitor {
                place,
                reviews: None,
            })
            .collect(),
        review_failures: Vec::new(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_scout_geo_models::Coordinate;
    use site_scout_places::memory::MemoryPlaces;

    fn place(id: &str, rating: f64, reviews: u64) -> Place {
        Place {
            place_id: id.to_string(),
            name: format!("Bakery {id}"),
            location: Coordinate { lat: 12.9, lng: 77.6 },
            rating,
            user_ratings_total: reviews,
            vicinity: Some("MG Road".to_string()),
            types: vec!["bakery".to_string()],
        }
    }

    #[test]
    fn averages_are_rounded() {
        let insights = summarize(
            "bakery",
            vec![place("a", 4.5, 10), place("b", 4.0, 21), place("c", 3.9, 0)],
        );
        assert_eq!(insights.total, 3);
        assert!((insights.avg_rating - 4.13).abs() < 1e-9);
        assert!((insights.avg_reviews - 10.33).abs() < 1e-9);
        assert_eq!(insights.details[1].place.place_id, "b");
        assert!(insights.details.iter().all(|c| c.reviews.is_none()));
    }

    #[test]
    fn no_competitors() {
        let insights = summarize("bakery", Vec::new());
        assert_eq!(insights.total, 0);
        assert!(insights.avg_rating.abs() < f64::EPSILON);
        assert!(insights.avg_reviews.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn uses_first_page_only() {
        let places = MemoryPlaces::new().with_pages(vec![
            vec![place("a", 4.0, 2)],
            vec![place("b", 2.0, 8)],
        ]);
        let query = NearbyQuery::keyword(Coordinate { lat: 12.9, lng: 77.6 }, 3000.0, "bakery");
        let insights = insights(&places, &query, "bakery").await.unwrap();
        assert_eq!(insights.total, 1);
        assert_eq!(places.page_requests(), vec![None]);
    }
}
