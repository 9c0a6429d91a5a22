#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Market overview around a base location.
//!
//! * [`category_trends`]: which business categories dominate or are scarce
//! * [`competitor_insights`]: how many competitors a category has and how
//!   well they are rated, optionally with review highlights
//! * [`competitor_heatmap`]: where those competitors are
//! * [`nearby_landmarks`]: hostels, schools, and apartments that bring
//!   footfall

pub mod allow_list;
pub mod competitors;
pub mod heatmap;
pub mod landmarks;
pub mod trends;

use site_scout_config::ScoutConfig;
use site_scout_market_models::{CompetitorInsights, Heatmap, Landmarks, TrendReport};
use site_scout_places::{Geocoder, PlacesError, PlacesProvider, resolve_base_location};
use site_scout_places_models::NearbyQuery;
use site_scout_reviews::{SentimentScorer, Vocabulary, summarize_places};

pub use allow_list::AllowList;

/// Reports the most and least common business categories around
/// `location_text`.
///
/// # Errors
///
/// Returns an error if the location cannot be resolved or the first result
/// page cannot be fetched.
pub async fn category_trends<G, P>(
    geocoder: &G,
    places: &P,
    config: &ScoutConfig,
    allow_list: &AllowList,
    location_text: &str,
) -> Result<TrendReport, PlacesError>
where
    G: Geocoder + ?Sized,
    P: PlacesProvider + ?Sized,
{
    let base = resolve_base_location(geocoder, location_text).await?;
    let query = NearbyQuery::place_type(
        base,
        config.places.search_radius_m,
        &config.trends.place_type,
    );
    let report = trends::aggregate(places, &query, &config.trends, allow_list).await?;
    if report.is_no_data() {
        log::info!("No relevant business categories found around {base}");
    }
    Ok(report)
}

/// Summarizes competitors for `category` around `location_text`.
///
/// # Errors
///
/// Returns an error if `category` is blank, the location cannot be
/// resolved, or the search fails.
pub async fn competitor_insights<G, P>(
    geocoder: &G,
    places: &P,
    config: &ScoutConfig,
    location_text: &str,
    category: &str,
) -> Result<CompetitorInsights, PlacesError>
where
    G: Geocoder + ?Sized,
    P: PlacesProvider + ?Sized,
{
    let query = keyword_query(geocoder, config, location_text, category).await?;
    competitors::insights(places, &query, category.trim()).await
}

/// Like [`competitor_insights`], with review highlights attached to each
/// competitor. Competitors whose reviews cannot be fetched are listed in
/// [`CompetitorInsights::review_failures`].
///
/// # Errors
///
/// Same as [`competitor_insights`]. Review failures are never fatal.
pub async fn competitor_insights_with_reviews<G, P>(
    geocoder: &G,
    places: &P,
    scorer: &(impl SentimentScorer + ?Sized),
    vocabulary: &Vocabulary,
    config: &ScoutConfig,
    location_text: &str,
    category: &str,
) -> Result<CompetitorInsights, PlacesError>
where
    G: Geocoder + ?Sized,
    P: PlacesProvider + ?Sized,
{
    let mut insights =
        competitor_insights(geocoder, places, config, location_text, category).await?;

    let ids: Vec<String> = insights
        .details
        .iter()
        .map(|c| c.place.place_id.clone())
        .collect();
    let batch = summarize_places(places, scorer, vocabulary, &config.reviews, &ids).await;

    let highlights: std::collections::HashMap<String, _> = batch
        .places
        .into_iter()
        .map(|p| (p.place_id, p.highlights))
        .collect();
    for competitor in &mut insights.details {
        competitor.reviews = highlights.get(&competitor.place.place_id).cloned();
    }
    insights.review_failures = batch.failed;
    Ok(insights)
}

/// Competitor coordinates for `category` around `location_text`.
///
/// # Errors
///
/// Returns an error if `category` is blank, the location cannot be
/// resolved, or the search fails.
pub async fn competitor_heatmap<G, P>(
    geocoder: &G,
    places: &P,
    config: &ScoutConfig,
    location_text: &str,
    category: &str,
) -> Result<Heatmap, PlacesError>
where
    G: Geocoder + ?Sized,
    P: PlacesProvider + ?Sized,
{
    let query = keyword_query(geocoder, config, location_text, category).await?;
    heatmap::heatmap(places, &query).await
}

/// Lists hostels, schools, and apartments within the configured search
/// radius of `location_text`.
///
/// # Errors
///
/// Returns an error only if the location cannot be resolved; failed
/// landmark searches are listed in [`Landmarks::failed`].
pub async fn nearby_landmarks<G, P>(
    geocoder: &G,
    places: &P,
    config: &ScoutConfig,
    location_text: &str,
) -> Result<Landmarks, PlacesError>
where
    G: Geocoder + ?Sized,
    P: PlacesProvider + ?Sized,
{
    let base = resolve_base_location(geocoder, location_text).await?;
    Ok(landmarks::collect(places, base, config.places.search_radius_m).await)
}

async fn keyword_query<G: Geocoder + ?Sized>(
    geocoder: &G,
    config: &ScoutConfig,
    location_text: &str,
    category: &str,
) -> Result<NearbyQuery, PlacesError> {
    let category = category.trim();
    if category.is_empty() {
        return Err(PlacesError::invalid_input("category must not be empty"));
    }
    let base = resolve_base_location(geocoder, location_text).await?;
    Ok(NearbyQuery::keyword(
        base,
        config.places.search_radius_m,
        category,
    ))
}
