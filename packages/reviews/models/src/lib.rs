#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Types produced by the review sentiment pipeline.
//!
//! A place's reviews are scored, split into a positive and a negative
//! group, and each group is condensed into a [`ReviewSummary`]. The
//! summary's aspect flags are drawn from the fixed [`Aspect`] taxonomy.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Placeholder shown in a compact line when no aspect matched.
pub const NO_ASPECTS: &str = "—";

/// A fixed review dimension, backed by a list of trigger words.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Aspect {
    /// Dishes, drinks, taste
    Food,
    /// Staff and how customers were treated
    Service,
    /// Cost and value for money
    Price,
    /// Atmosphere, decor, noise, cleanliness
    Ambience,
    /// Overall standard of goods
    Quality,
    /// Waiting and speed
    Time,
}

impl Aspect {
    /// Every aspect, in the order they are reported.
    pub const ALL: [Self; 6] = [
        Self::Food,
        Self::Service,
        Self::Price,
        Self::Ambience,
        Self::Quality,
        Self::Time,
    ];

    /// Two-letter code used in compact summary lines.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Food => "FD",
            Self::Service => "SV",
            Self::Price => "PR",
            Self::Ambience => "AM",
            Self::Quality => "QL",
            Self::Time => "TM",
        }
    }
}

/// The set of aspects matched by a review group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AspectFlags(BTreeSet<Aspect>);

impl AspectFlags {
    /// Marks `aspect` as matched.
    pub fn insert(&mut self, aspect: Aspect) {
        self.0.insert(aspect);
    }

    #[must_use]
    pub fn contains(&self, aspect: Aspect) -> bool {
        self.0.contains(&aspect)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Matched aspects in reporting order.
    pub fn aspects(&self) -> impl Iterator<Item = Aspect> + '_ {
        self.0.iter().copied()
    }

    /// Comma-joined aspect codes, or [`NO_ASPECTS`] when nothing matched.
    #[must_use]
    pub fn codes(&self) -> String {
        if self.is_empty() {
            return NO_ASPECTS.to_string();
        }
        self.aspects().map(Aspect::code).collect::<Vec<_>>().join(", ")
    }

    /// Comma-joined aspect names, or `None` when nothing matched.
    #[must_use]
    pub fn names(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(self.aspects().map(|a| a.as_ref().to_owned()).collect::<Vec<_>>().join(", "))
    }
}

impl FromIterator<Aspect> for AspectFlags {
    fn from_iter<I: IntoIterator<Item = Aspect>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Which half of the partition a summary describes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
pub enum SentimentGroup {
    #[strum(serialize = "POS")]
    Positive,
    #[strum(serialize = "NEG")]
    Negative,
}

/// A review after polarity scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredReview {
    pub author: String,
    /// Star rating, 1 to 5.
    pub rating: u8,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Sentiment in [-1, 1].
    pub polarity: f64,
}

/// Condensed view of one review group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub group: SentimentGroup,
    /// Mean polarity of the group's reviews (0 for an empty group).
    pub mean_polarity: f64,
    pub aspects: AspectFlags,
    /// Up to 10 most frequent keywords, most frequent first.
    pub keywords: Vec<String>,
    /// `"{LABEL} -> S:{mean} | A:{codes} | K:{keywords}"`
    pub compact_line: String,
    pub highlight_sentence: String,
    pub reviews: Vec<ScoredReview>,
}

/// Outcome of summarizing one place's reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReviewHighlights {
    /// The place has no reviews with usable text.
    NoReviews {
        /// Reviews dropped because their text was blank.
        discarded: usize,
    },
    /// Positive and negative summaries. With five or fewer reviews the
    /// groups may share reviews.
    Summaries {
        positive: ReviewSummary,
        negative: ReviewSummary,
        /// Reviews that were scored.
        reviewed: usize,
        /// Reviews dropped because their text was blank.
        discarded: usize,
    },
}

/// Highlights for one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceReviews {
    pub place_id: String,
    pub highlights: ReviewHighlights,
}

/// Highlights for many places. Places whose reviews could not be fetched
/// are listed in `failed` instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewBatch {
    pub places: Vec<PlaceReviews>,
    pub failed: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_codes_and_names() {
        let codes: Vec<&str> = Aspect::ALL.iter().map(|a| a.code()).collect();
        assert_eq!(codes, vec!["FD", "SV", "PR", "AM", "QL", "TM"]);
        assert_eq!(Aspect::Ambience.to_string(), "ambience");
        assert_eq!("time".parse::<Aspect>().unwrap(), Aspect::Time);
    }

    #[test]
    fn flags_keep_reporting_order() {
        let flags: AspectFlags = [Aspect::Time, Aspect::Food, Aspect::Service]
            .into_iter()
            .collect();
        assert_eq!(flags.codes(), "FD, SV, TM");
        assert_eq!(flags.names().as_deref(), Some("food, service, time"));
    }

    #[test]
    fn empty_flags_use_placeholder() {
        let flags = AspectFlags::default();
        assert_eq!(flags.codes(), NO_ASPECTS);
        assert!(flags.names().is_none());
    }

    #[test]
    fn group_labels() {
        assert_eq!(SentimentGroup::Positive.to_string(), "POS");
        assert_eq!(SentimentGroup::Negative.to_string(), "NEG");
    }

    #[test]
    fn highlights_are_tagged() {
        let json = serde_json::to_value(ReviewHighlights::NoReviews { discarded: 2 }).unwrap();
        assert_eq!(json["status"], "no_reviews");
        assert_eq!(json["discarded"], 2);
    }
}
