#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Place provider value types.
//!
//! These mirror what a nearby-search style places API hands back: points of
//! interest with their category tags, result pages linked by continuation
//! tokens, and raw customer reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use site_scout_geo_models::Coordinate;

/// A point of interest (business location) from a nearby search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Provider-assigned stable identifier.
    pub place_id: String,
    /// Business name.
    pub name: String,
    /// Business location.
    pub location: Coordinate,
    /// Average star rating, 0 when the provider has none.
    #[serde(default)]
    pub rating: f64,
    /// Number of ratings behind [`Place::rating`].
    #[serde(default)]
    pub user_ratings_total: u64,
    /// Short address / neighbourhood description.
    pub vicinity: Option<String>,
    /// Raw category tags (e.g. `"cafe"`, `"food"`, `"establishment"`).
    #[serde(default)]
    pub types: Vec<String>,
}

/// One page of nearby search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacesPage {
    /// Places on this page.
    pub results: Vec<Place>,
    /// Opaque token for the next page, `None` on the last page.
    pub next_page_token: Option<String>,
}

/// Parameters for a nearby search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyQuery {
    /// Search center.
    pub location: Coordinate,
    /// Search radius in meters.
    pub radius_m: f64,
    /// Restrict to a provider place type (e.g. `"establishment"`).
    pub place_type: Option<String>,
    /// Free-text keyword (e.g. a business category like `"bakery"`).
    pub keyword: Option<String>,
}

impl NearbyQuery {
    /// A keyword search around `location`.
    #[must_use]
    pub fn keyword(location: Coordinate, radius_m: f64, keyword: &str) -> Self {
        Self {
            location,
            radius_m,
            place_type: None,
            keyword: Some(keyword.to_owned()),
        }
    }

    /// A place-type search around `location`.
    #[must_use]
    pub fn place_type(location: Coordinate, radius_m: f64, place_type: &str) -> Self {
        Self {
            location,
            radius_m,
            place_type: Some(place_type.to_owned()),
            keyword: None,
        }
    }
}

/// A customer review as delivered by the provider, before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReview {
    /// Reviewer display name.
    pub author: String,
    /// Star rating, nominally 1-5.
    pub rating: u8,
    /// Free-text review body (may be empty).
    pub text: String,
    /// When the review was posted.
    pub timestamp: DateTime<Utc>,
}
