//! Keyword and aspect extraction for a review group.

use std::collections::HashMap;

use site_scout_reviews_models::{Aspect, AspectFlags};

use crate::tokens::tokenize;
use crate::vocabulary::Vocabulary;

/// How many common keywords a group keeps.
pub const MAX_KEYWORDS: usize = 10;

/// Shortest token kept as a keyword.
const MIN_KEYWORD_LEN: usize = 3;

/// Keywords and matched aspects for one review group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AspectMatch {
    /// Aspects triggered by at least one of the keywords.
    pub flags: AspectFlags,
    /// Most frequent first; equal counts in order of first occurrence.
    pub keywords: Vec<String>,
}

/// Finds a group's common keywords and the aspects they trigger.
///
/// An empty group, or one with only stopwords and short tokens, yields
/// no flags and no keywords.
#[must_use]
pub fn extract<'a>(texts: impl IntoIterator<Item = &'a str>, vocabulary: &Vocabulary) -> AspectMatch {
    let keywords = common_keywords(texts, vocabulary);
    let flags = Aspect::ALL
        .into_iter()
        .filter(|&aspect| keywords.iter().any(|k| vocabulary.triggers(aspect, k)))
        .collect();
    AspectMatch { flags, keywords }
}

fn common_keywords<'a>(texts: impl IntoIterator<Item = &'a str>, vocabulary: &Vocabulary) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for text in texts {
        for token in tokenize(text) {
            if token.chars().count() < MIN_KEYWORD_LEN || vocabulary.is_stopword(&token) {
                continue;
            }
            if let Some(&i) = index.get(&token) {
                counts[i].1 += 1;
            } else {
                index.insert(token.clone(), counts.len());
                counts.push((token, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(token, _)| token)
        .collect()
}
