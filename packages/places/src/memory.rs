//! Deterministic in-memory adapter.
//!
//! [`MemoryPlaces`] implements every capability port from canned data so
//! the analysis pipelines can be exercised without network access. It
//! records the calls it receives, which lets tests assert on call order
//! (e.g. that trend pagination is strictly sequential).

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use site_scout_geo_models::Coordinate;
use site_scout_places_models::{NearbyQuery, Place, PlacesPage, RawReview};

use crate::{Geocoder, PlacesError, PlacesProvider};

/// Coordinates closer than this (in degrees) are treated as the same point.
const COORDINATE_TOLERANCE: f64 = 1e-7;

type CountFn = dyn Fn(Coordinate) -> Result<u64, PlacesError> + Send + Sync;

/// Canned-data implementation of [`Geocoder`] and [`PlacesProvider`].
#[derive(Default)]
pub struct MemoryPlaces {
    geocodes: BTreeMap<String, Coordinate>,
    geocoder_fails: bool,
    names: Vec<(Coordinate, String)>,
    reverse_failures: Vec<Coordinate>,
    counter: Option<Box<CountFn>>,
    pages: Vec<Vec<Place>>,
    failing_pages: BTreeSet<usize>,
    typed_results: BTreeMap<String, Vec<Place>>,
    failing_types: BTreeSet<String>,
    reviews: BTreeMap<String, Vec<RawReview>>,
    failing_reviews: BTreeSet<String>,
    slow_counts: Vec<(Coordinate, Duration)>,
    slow_names: Vec<(Coordinate, Duration)>,
    slow_reviews: BTreeMap<String, Duration>,
    geocode_calls: AtomicUsize,
    page_requests: Mutex<Vec<Option<String>>>,
}

impl MemoryPlaces {
    /// An adapter with no data: geocoding matches nothing, counts are zero,
    /// searches return one empty page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Geocodes `text` (exact match) to `coordinate`.
    #[must_use]
    pub fn with_geocode(mut self, text: &str, coordinate: Coordinate) -> Self {
        self.geocodes.insert(text.to_owned(), coordinate);
        self
    }

    /// Makes every forward geocode fail as if the provider were down.
    #[must_use]
    pub const fn with_failing_geocoder(mut self) -> Self {
        self.geocoder_fails = true;
        self
    }

    /// Reverse geocodes `coordinate` to `name`.
    #[must_use]
    pub fn with_place_name(mut self, coordinate: Coordinate, name: &str) -> Self {
        self.names.push((coordinate, name.to_owned()));
        self
    }

    /// Makes reverse geocoding of `coordinate` fail.
    #[must_use]
    pub fn with_failing_reverse(mut self, coordinate: Coordinate) -> Self {
        self.reverse_failures.push(coordinate);
        self
    }

    /// Answers density probes with `counter`.
    #[must_use]
    pub fn with_counts(
        mut self,
        counter: impl Fn(Coordinate) -> Result<u64, PlacesError> + Send + Sync + 'static,
    ) -> Self {
        self.counter = Some(Box::new(counter));
        self
    }

    /// Serves `pages` in order for every nearby search. Page `i` links to
    /// page `i + 1` with the token `"page-{i + 1}"`.
    #[must_use]
    pub fn with_pages(mut self, pages: Vec<Vec<Place>>) -> Self {
        self.pages = pages;
        self
    }

    /// Makes the page at `index` (0-based) fail.
    #[must_use]
    pub fn with_failing_page(mut self, index: usize) -> Self {
        self.failing_pages.insert(index);
        self
    }

    /// Answers place-type searches for `place_type` with a single page of
    /// `results`, ahead of the pages from [`Self::with_pages`].
    #[must_use]
    pub fn with_type_results(mut self, place_type: &str, results: Vec<Place>) -> Self {
        self.typed_results.insert(place_type.to_owned(), results);
        self
    }

    /// Makes place-type searches for `place_type` fail.
    #[must_use]
    pub fn with_failing_type(mut self, place_type: &str) -> Self {
        self.failing_types.insert(place_type.to_owned());
        self
    }

    /// Serves `reviews` for `place_id`.
    #[must_use]
    pub fn with_reviews(mut self, place_id: &str, reviews: Vec<RawReview>) -> Self {
        self.reviews.insert(place_id.to_owned(), reviews);
        self
    }

    /// Makes review fetches for `place_id` fail.
    #[must_use]
    pub fn with_failing_reviews(mut self, place_id: &str) -> Self {
        self.failing_reviews.insert(place_id.to_owned());
        self
    }

    /// Delays the density probe at `coordinate` by `delay` before answering.
    #[must_use]
    pub fn with_slow_count(mut self, coordinate: Coordinate, delay: Duration) -> Self {
        self.slow_counts.push((coordinate, delay));
        self
    }

    /// Delays reverse geocoding of `coordinate` by `delay` before answering.
    #[must_use]
    pub fn with_slow_reverse(mut self, coordinate: Coordinate, delay: Duration) -> Self {
        self.slow_names.push((coordinate, delay));
        self
    }

    /// Delays review fetches for `place_id` by `delay` before answering.
    #[must_use]
    pub fn with_slow_reviews(mut self, place_id: &str, delay: Duration) -> Self {
        self.slow_reviews.insert(place_id.to_owned(), delay);
        self
    }

    /// Number of forward geocode calls received.
    #[must_use]
    pub fn geocode_calls(&self) -> usize {
        self.geocode_calls.load(Ordering::SeqCst)
    }

    /// Page tokens received by [`PlacesProvider::nearby_page`], in call order.
    #[must_use]
    pub fn page_requests(&self) -> Vec<Option<String>> {
        self.page_requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn page_index(token: Option<&str>) -> Result<usize, PlacesError> {
        token.map_or(Ok(0), |t| {
            t.strip_prefix("page-")
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| PlacesError::invalid_input(format!("unknown page token '{t}'")))
        })
    }
}

fn same_point(a: Coordinate, b: Coordinate) -> bool {
    (a.lat - b.lat).abs() < COORDINATE_TOLERANCE && (a.lng - b.lng).abs() < COORDINATE_TOLERANCE
}

async fn stall_at(delays: &[(Coordinate, Duration)], coordinate: Coordinate) {
    if let Some((_, delay)) = delays.iter().find(|(c, _)| same_point(*c, coordinate)) {
        tokio::time::sleep(*delay).await;
    }
}

#[async_trait]
impl Geocoder for MemoryPlaces {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinate>, PlacesError> {
        self.geocode_calls.fetch_add(1, Ordering::SeqCst);
        if self.geocoder_fails {
            return Err(PlacesError::Status {
                status: "UNKNOWN_ERROR".to_string(),
                message: "geocoder unavailable".to_string(),
            });
        }
        Ok(self.geocodes.get(query).copied())
    }

    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Option<String>, PlacesError> {
        stall_at(&self.slow_names, coordinate).await;
        if self.reverse_failures.iter().any(|c| same_point(*c, coordinate)) {
            return Err(PlacesError::Timeout {
                operation: format!("reverse geocode {coordinate}"),
            });
        }
        Ok(self
            .names
            .iter()
            .find(|(c, _)| same_point(*c, coordinate))
            .map(|(_, name)| name.clone()))
    }
}

#[async_trait]
impl PlacesProvider for MemoryPlaces {
    async fn nearby_count(
        &self,
        coordinate: Coordinate,
        _radius_m: f64,
        _category: &str,
    ) -> Result<u64, PlacesError> {
        stall_at(&self.slow_counts, coordinate).await;
        self.counter.as_ref().map_or(Ok(0), |count| count(coordinate))
    }

    async fn nearby_page(
        &self,
        query: &NearbyQuery,
        page_token: Option<&str>,
    ) -> Result<PlacesPage, PlacesError> {
        self.page_requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(page_token.map(String::from));

        if let Some(place_type) = query.place_type.as_deref() {
            if self.failing_types.contains(place_type) {
                return Err(PlacesError::Status {
                    status: "UNKNOWN_ERROR".to_string(),
                    message: format!("{place_type} search unavailable"),
                });
            }
            if let Some(results) = self.typed_results.get(place_type) {
                return Ok(PlacesPage {
                    results: results.clone(),
                    next_page_token: None,
                });
            }
        }

        let index = Self::page_index(page_token)?;
        if self.failing_pages.contains(&index) {
            return Err(PlacesError::Status {
                status: "UNKNOWN_ERROR".to_string(),
                message: format!("page {index} unavailable"),
            });
        }

        let results = self.pages.get(index).cloned().unwrap_or_default();
        let next_page_token =
            (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 1));

        Ok(PlacesPage {
            results,
            next_page_token,
        })
    }

    async fn fetch_reviews(&self, place_id: &str) -> Result<Vec<RawReview>, PlacesError> {
        if let Some(delay) = self.slow_reviews.get(place_id) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_reviews.contains(place_id) {
            return Err(PlacesError::Status {
                status: "HTTP 503".to_string(),
                message: format!("reviews for {place_id} unavailable"),
            });
        }
        Ok(self.reviews.get(place_id).cloned().unwrap_or_default())
    }
}
