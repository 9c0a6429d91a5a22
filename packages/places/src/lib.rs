#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Capability ports for geocoding and place lookups.
//!
//! The analysis engine never talks to a places API directly. It depends on
//! the [`Geocoder`] and [`PlacesProvider`] traits, which have two
//! implementations:
//!
//! 1. [`google::GoogleMapsClient`]: the production adapter for the Google
//!    Maps Geocoding and Places web services, with retry and per-request
//!    timeouts.
//! 2. [`memory::MemoryPlaces`]: a deterministic in-memory adapter for tests
//!    and offline runs.
//!
//! [`location::resolve_base_location`] turns user supplied location text
//! into the single base coordinate every analysis starts from.

pub mod google;
pub mod location;
pub mod memory;
pub mod retry;

use site_scout_geo_models::Coordinate;
use site_scout_places_models::{NearbyQuery, PlacesPage, RawReview};
use thiserror::Error;

pub use location::resolve_base_location;

/// Errors from geocoding and place lookups.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// The provider answered with a non-success status.
    #[error("Provider returned {status}: {message}")]
    Status {
        /// Provider status code (e.g. `"REQUEST_DENIED"`, `"HTTP 403"`).
        status: String,
        /// Provider supplied detail, if any.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// The call did not complete in time.
    #[error("Timed out: {operation}")]
    Timeout {
        /// What was being attempted.
        operation: String,
    },

    /// The base location text matched nothing.
    #[error("Location not found: {query}")]
    NotFound {
        /// The text that was geocoded.
        query: String,
    },

    /// Caller input was malformed; nothing was attempted.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input.
        message: String,
    },
}

impl PlacesError {
    /// `true` for caller mistakes, `false` for upstream unavailability.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Shorthand for [`PlacesError::InvalidInput`].
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Forward and reverse geocoding.
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves free-form text to a coordinate, `None` when nothing matched.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] if the provider could not be reached or
    /// answered with an error.
    async fn geocode(&self, query: &str) -> Result<Option<Coordinate>, PlacesError>;

    /// Resolves a coordinate to a human-readable place name, `None` when the
    /// provider knows no name for it.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] if the provider could not be reached or
    /// answered with an error.
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Option<String>, PlacesError>;
}

/// Point-of-interest lookups.
#[async_trait::async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Counts POIs matching `category` within `radius_m` of `coordinate`.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] if the lookup fails.
    async fn nearby_count(
        &self,
        coordinate: Coordinate,
        radius_m: f64,
        category: &str,
    ) -> Result<u64, PlacesError>;

    /// Fetches one page of a nearby search. `page_token` is `None` for the
    /// first page and the previous page's continuation token afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] if the lookup fails.
    async fn nearby_page(
        &self,
        query: &NearbyQuery,
        page_token: Option<&str>,
    ) -> Result<PlacesPage, PlacesError>;

    /// Fetches the customer reviews of one place. An empty list is a valid
    /// "no reviews" answer.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] if the lookup fails.
    async fn fetch_reviews(&self, place_id: &str) -> Result<Vec<RawReview>, PlacesError>;
}
