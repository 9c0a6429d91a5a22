//! Keyword stopwords and aspect trigger words.
//!
//! The built-in vocabulary is embedded from `data/vocabulary.toml`; a
//! replacement can be parsed from any TOML string of the same shape.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use site_scout_reviews_models::Aspect;
use thiserror::Error;

const BUILTIN_VOCABULARY: &str = include_str!("../data/vocabulary.toml");

/// Errors from loading vocabulary or lexicon data.
#[derive(Debug, Error)]
pub enum VocabularyError {
    /// The TOML did not parse.
    #[error("Failed to parse vocabulary: {0}")]
    Parse(#[from] toml::de::Error),

    /// A trigger table names an aspect that does not exist.
    #[error("Unknown aspect '{name}'")]
    UnknownAspect {
        /// The table key as written.
        name: String,
    },

    /// An aspect has no trigger words.
    #[error("Aspect '{aspect}' has no trigger words")]
    MissingAspect {
        /// The aspect without triggers.
        aspect: Aspect,
    },
}

#[derive(Debug, Deserialize)]
struct VocabularyFile {
    stopwords: Vec<String>,
    aspects: BTreeMap<String, Vec<String>>,
}

/// Stopwords and per-aspect trigger words, all lowercase.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    stopwords: BTreeSet<String>,
    triggers: BTreeMap<Aspect, BTreeSet<String>>,
}

impl Vocabulary {
    /// Returns the embedded vocabulary.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (it ships with the crate and
    /// is covered by tests).
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_toml_str(BUILTIN_VOCABULARY)
            .unwrap_or_else(|e| panic!("Embedded vocabulary is invalid: {e}"))
    }

    /// Parses a vocabulary from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError`] if the TOML is malformed or an aspect is
    /// missing its trigger words.
    pub fn from_toml_str(text: &str) -> Result<Self, VocabularyError> {
        let file: VocabularyFile = toml::de::from_str(text)?;

        let mut tables = BTreeMap::new();
        for (name, words) in file.aspects {
            let aspect = name
                .trim()
                .to_lowercase()
                .parse::<Aspect>()
                .map_err(|_| VocabularyError::UnknownAspect { name })?;
            tables.insert(aspect, words);
        }

        let mut triggers = BTreeMap::new();
        for aspect in Aspect::ALL {
            let words: BTreeSet<String> = tables
                .get(&aspect)
                .into_iter()
                .flatten()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect();
            if words.is_empty() {
                return Err(VocabularyError::MissingAspect { aspect });
            }
            triggers.insert(aspect, words);
        }

        Ok(Self {
            stopwords: file
                .stopwords
                .iter()
                .map(|w| w.trim().to_lowercase())
                .collect(),
            triggers,
        })
    }

    #[must_use]
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Whether `word` is one of `aspect`'s triggers.
    #[must_use]
    pub fn triggers(&self, aspect: Aspect, word: &str) -> bool {
        self.triggers
            .get(&aspect)
            .is_some_and(|words| words.contains(word))
    }

    #[must_use]
    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_parses() {
        let vocabulary = Vocabulary::builtin();
        assert_eq!(vocabulary.stopword_count(), 28);
        assert!(vocabulary.is_stopword("the"));
        assert!(vocabulary.triggers(Aspect::Food, "food"));
        assert!(vocabulary.triggers(Aspect::Service, "service"));
        assert!(vocabulary.triggers(Aspect::Time, "fast"));
        assert!(vocabulary.triggers(Aspect::Time, "wait"));
    }

    #[test]
    fn generic_sentiment_words_trigger_nothing() {
        let vocabulary = Vocabulary::builtin();
        for word in ["great", "terrible", "cold", "good", "bad"] {
            for aspect in Aspect::ALL {
                assert!(
                    !vocabulary.triggers(aspect, word),
                    "'{word}' should not trigger {aspect}"
                );
            }
        }
    }

    #[test]
    fn missing_aspect_is_rejected() {
        let err = Vocabulary::from_toml_str(
            r#"
            stopwords = ["the"]
            [aspects]
            food = ["food"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            VocabularyError::MissingAspect {
                aspect: Aspect::Service
            }
        ));
    }

    #[test]
    fn custom_vocabulary_is_lowercased() {
        let vocabulary = Vocabulary::from_toml_str(
            r#"
            stopwords = ["The"]
            [aspects]
            food = ["Food"]
            service = ["staff"]
            price = ["price"]
            ambience = ["music"]
            quality = ["quality"]
            time = ["wait"]
            "#,
        )
        .unwrap();
        assert!(vocabulary.is_stopword("the"));
        assert!(vocabulary.triggers(Aspect::Food, "food"));
    }

    #[test]
    fn unknown_aspect_is_rejected() {
        let err = Vocabulary::from_toml_str(
            r#"
            stopwords = []
            [aspects]
            parking = ["parking"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, VocabularyError::UnknownAspect { name } if name == "parking"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(matches!(
            Vocabulary::from_toml_str("stopwords = ["),
            Err(VocabularyError::Parse(_))
        ));
    }
}
