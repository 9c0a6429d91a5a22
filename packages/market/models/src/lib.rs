#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Market overview result types: category trends around a location, the
//! competitors of a business category, competitor heatmaps, and nearby
//! landmarks.

use serde::{Deserialize, Serialize};
use site_scout_geo_models::Coordinate;
use site_scout_places_models::Place;
use site_scout_reviews_models::ReviewHighlights;

/// How often a business category was seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

/// Most and least common business categories around a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendReport {
    Categories {
        /// Up to 5 categories, most frequent first.
        top_categories: Vec<CategoryCount>,
        /// Up to 5 categories, least frequent first.
        bottom_categories: Vec<CategoryCount>,
        /// Result pages that were counted.
        pages_fetched: u32,
        /// A later page failed, or the page limit stopped pagination while
        /// more results were available, so the counts cover only the first
        /// `pages_fetched` pages.
        truncated: bool,
    },
    /// No business-relevant category was found.
    NoData,
}

impl TrendReport {
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

/// One competitor, optionally with its review highlights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    #[serde(flatten)]
    pub place: Place,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<ReviewHighlights>,
}

/// Summary of the competitors found near a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorInsights {
    pub category: String,
    pub total: usize,
    /// Mean star rating, rounded to 2 decimals (0 with no competitors).
    pub avg_rating: f64,
    /// Mean review count, rounded to 2 decimals (0 with no competitors).
    pub avg_reviews: f64,
    pub details: Vec<Competitor>,
    /// Competitors whose reviews could not be fetched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub review_failures: Vec<String>,
}

/// Competitor locations for plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub center: Coordinate,
    pub coordinates: Vec<Coordinate>,
    pub count: usize,
}

/// Names of nearby places of one landmark kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkGroup {
    /// Label such as `"schools"`.
    pub kind: String,
    /// Provider place type searched for this kind.
    pub place_type: String,
    /// Up to 5 names in provider order.
    pub names: Vec<String>,
}

/// Landmarks that drive footfall around a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmarks {
    pub center: Coordinate,
    /// One group per landmark kind that could be searched.
    pub groups: Vec<LandmarkGroup>,
    /// Kinds whose search failed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,
}

impl Landmarks {
    /// Names found for `kind`, if that kind was searched successfully.
    #[must_use]
    pub fn names(&self, kind: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|g| g.kind == kind)
            .map(|g| g.names.as_slice())
    }
}
