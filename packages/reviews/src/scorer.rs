//! Review polarity scoring.
//!
//! The pipeline only depends on the [`SentimentScorer`] trait. Two
//! implementations ship with the crate:
//!
//! 1. [`LexiconScorer`]: averages word polarities from an embedded lexicon,
//!    with intensifier and negation handling.
//! 2. [`CannedScorer`]: returns fixed scores per review text, for tests.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::VocabularyError;
use crate::tokens::tokenize;

const BUILTIN_LEXICON: &str = include_str!("../data/lexicon.toml");

/// Scores review text to a polarity.
pub trait SentimentScorer: Send + Sync {
    /// Polarity of `text`. Callers clamp the result to [-1, 1], so
    /// implementations need not.
    fn polarity(&self, text: &str) -> f64;
}

/// Scores `text` with `scorer`, clamped to [-1, 1]. Non-finite scores are
/// treated as neutral.
#[must_use]
pub fn clamped_polarity(scorer: &(impl SentimentScorer + ?Sized), text: &str) -> f64 {
    let polarity = scorer.polarity(text);
    if polarity.is_finite() {
        polarity.clamp(-1.0, 1.0)
    } else {
        log::warn!("Scorer returned non-finite polarity {polarity}; treating as neutral");
        0.0
    }
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    negators: Vec<String>,
    #[serde(default = "default_negation_window")]
    negation_window: usize,
    #[serde(default = "default_negation_factor")]
    negation_factor: f64,
    #[serde(default)]
    intensifiers: BTreeMap<String, f64>,
    words: BTreeMap<String, f64>,
}

const fn default_negation_window() -> usize {
    3
}

const fn default_negation_factor() -> f64 {
    -0.5
}

/// Word-list sentiment scorer.
///
/// A text's polarity is the mean of the polarities of its sentiment words.
/// A word directly after an intensifier is scaled by it. A word with a
/// negator among the preceding `negation_window` tokens is multiplied by
/// `negation_factor`. Text without sentiment words scores 0.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    words: BTreeMap<String, f64>,
    intensifiers: BTreeMap<String, f64>,
    negators: BTreeSet<String>,
    negation_window: usize,
    negation_factor: f64,
}

impl LexiconScorer {
    /// Returns the scorer backed by the embedded lexicon.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (it ships with the crate and
    /// is covered by tests).
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_toml_str(BUILTIN_LEXICON)
            .unwrap_or_else(|e| panic!("Embedded lexicon is invalid: {e}"))
    }

    /// Parses a lexicon from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::Parse`] if the TOML is malformed.
    pub fn from_toml_str(text: &str) -> Result<Self, VocabularyError> {
        let file: LexiconFile = toml::de::from_str(text)?;
        Ok(Self {
            words: lowercase_keys(file.words),
            intensifiers: lowercase_keys(file.intensifiers),
            negators: file.negators.iter().map(|w| w.to_lowercase()).collect(),
            negation_window: file.negation_window,
            negation_factor: file.negation_factor,
        })
    }
}

fn lowercase_keys(map: BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    map.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect()
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SentimentScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut scores = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.words.get(token) else {
                continue;
            };
            let mut score = base;

            if let Some(boost) = i
                .checked_sub(1)
                .and_then(|p| self.intensifiers.get(&tokens[p]))
            {
                score *= boost;
            }

            let window = &tokens[i.saturating_sub(self.negation_window)..i];
            if window.iter().any(|t| self.negators.contains(t)) {
                score *= self.negation_factor;
            }

            scores.push(score);
        }

        if scores.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

/// Scorer returning fixed polarities per exact review text.
#[derive(Debug, Clone, Default)]
pub struct CannedScorer {
    scores: BTreeMap<String, f64>,
    fallback: f64,
}

impl CannedScorer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores `text` as `polarity`.
    #[must_use]
    pub fn with_score(mut self, text: &str, polarity: f64) -> Self {
        self.scores.insert(text.to_owned(), polarity);
        self
    }

    /// Score for texts without an explicit entry (0 unless set).
    #[must_use]
    pub const fn with_fallback(mut self, polarity: f64) -> Self {
        self.fallback = polarity;
        self
    }
}

impl SentimentScorer for CannedScorer {
    fn polarity(&self, text: &str) -> f64 {
        self.scores.get(text).copied().unwrap_or(self.fallback)
    }
}
