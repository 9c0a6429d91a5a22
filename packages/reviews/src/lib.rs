#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Review sentiment highlights.
//!
//! For each place the pipeline:
//!
//! 1. fetches up to `max_reviews` reviews,
//! 2. drops reviews with blank text and scores the rest
//!    ([`scorer::SentimentScorer`]),
//! 3. picks the most positive and most negative reviews
//!    ([`partition::partition`]),
//! 4. extracts each group's common keywords and aspects
//!    ([`aspects::extract`]),
//! 5. condenses each group into a [`ReviewSummary`] ([`summary::compose`]).
//!
//! A place without usable reviews yields [`ReviewHighlights::NoReviews`].

pub mod aspects;
pub mod partition;
pub mod scorer;
pub mod summary;
mod tokens;
pub mod vocabulary;

use futures::stream::{self, StreamExt as _};
use site_scout_config::ReviewConfig;
use site_scout_places::{PlacesError, PlacesProvider};
use site_scout_places_models::RawReview;
use site_scout_reviews_models::{
    PlaceReviews, ReviewBatch, ReviewHighlights, ReviewSummary, ScoredReview, SentimentGroup,
};

pub use scorer::{CannedScorer, LexiconScorer, SentimentScorer};
pub use vocabulary::{Vocabulary, VocabularyError};

/// Fetches at most `config.max_reviews` reviews for `place_id`.
///
/// # Errors
///
/// Returns the provider's error, or [`PlacesError::Timeout`] if the fetch
/// exceeds `config.fetch_timeout()`.
pub async fn ingest(
    places: &(impl PlacesProvider + ?Sized),
    place_id: &str,
    config: &ReviewConfig,
) -> Result<Vec<RawReview>, PlacesError> {
    let mut reviews = tokio::time::timeout(config.fetch_timeout(), places.fetch_reviews(place_id))
        .await
        .map_err(|_| PlacesError::Timeout {
            operation: format!("review fetch for {place_id}"),
        })??;
    reviews.truncate(config.max_reviews);
    Ok(reviews)
}

/// Scores reviews with usable text. Returns the scored reviews and how many
/// were discarded for blank text.
pub fn score(
    scorer: &(impl SentimentScorer + ?Sized),
    reviews: Vec<RawReview>,
) -> (Vec<ScoredReview>, usize) {
    let total = reviews.len();
    let scored: Vec<ScoredReview> = reviews
        .into_iter()
        .filter(|r| !r.text.trim().is_empty())
        .map(|r| {
            let polarity = scorer::clamped_polarity(scorer, &r.text);
            ScoredReview {
                author: r.author,
                rating: r.rating.clamp(1, 5),
                text: r.text,
                timestamp: r.timestamp,
                polarity,
            }
        })
        .collect();
    let discarded = total - scored.len();
    (scored, discarded)
}

/// Builds highlights from already-scored reviews.
#[must_use]
pub fn highlight(
    reviews: &[ScoredReview],
    discarded: usize,
    vocabulary: &Vocabulary,
    config: &ReviewConfig,
) -> ReviewHighlights {
    if reviews.is_empty() {
        return ReviewHighlights::NoReviews { discarded };
    }

    let groups = partition::partition(reviews, config.group_size);
    ReviewHighlights::Summaries {
        positive: summarize_group(SentimentGroup::Positive, groups.positive, vocabulary),
        negative: summarize_group(SentimentGroup::Negative, groups.negative, vocabulary),
        reviewed: reviews.len(),
        discarded,
    }
}

fn summarize_group(
    group: SentimentGroup,
    reviews: Vec<ScoredReview>,
    vocabulary: &Vocabulary,
) -> ReviewSummary {
    let found = aspects::extract(reviews.iter().map(|r| r.text.as_str()), vocabulary);
    summary::compose(group, reviews, found.flags, found.keywords)
}

/// Runs the whole pipeline for one place.
///
/// # Errors
///
/// Returns an error only if the reviews could not be fetched.
pub async fn summarize_place(
    places: &(impl PlacesProvider + ?Sized),
    scorer: &(impl SentimentScorer + ?Sized),
    vocabulary: &Vocabulary,
    config: &ReviewConfig,
    place_id: &str,
) -> Result<ReviewHighlights, PlacesError> {
    let raw = ingest(places, place_id, config).await?;
    let (scored, discarded) = score(scorer, raw);
    if discarded > 0 {
        log::debug!("Discarded {discarded} blank review(s) for {place_id}");
    }
    Ok(highlight(&scored, discarded, vocabulary, config))
}

/// Runs the pipeline for every place in `place_ids`.
///
/// A place whose reviews cannot be fetched is logged and listed in
/// [`ReviewBatch::failed`]; the other places are still summarized. Results
/// keep the input order.
pub async fn summarize_places(
    places: &(impl PlacesProvider + ?Sized),
    scorer: &(impl SentimentScorer + ?Sized),
    vocabulary: &Vocabulary,
    config: &ReviewConfig,
    place_ids: &[String],
) -> ReviewBatch {
    let outcomes: Vec<(&String, Result<ReviewHighlights, PlacesError>)> =
        stream::iter(place_ids.iter().map(|place_id| async move {
            let outcome = summarize_place(places, scorer, vocabulary, config, place_id).await;
            (place_id, outcome)
        }))
        .buffered(config.fetch_concurrency.max(1))
        .collect()
        .await;

    let mut batch = ReviewBatch::default();
    for (place_id, outcome) in outcomes {
        match outcome {
            Ok(highlights) => batch.places.push(PlaceReviews {
                place_id: place_id.clone(),
                highlights,
            }),
            Err(e) => {
                log::warn!("Failed to fetch reviews for {place_id}: {e}");
                batch.failed.push(place_id.clone());
            }
        }
    }

    log::info!(
        "Summarized reviews for {}/{} places",
        batch.places.len(),
        place_ids.len()
    );
    batch
}
