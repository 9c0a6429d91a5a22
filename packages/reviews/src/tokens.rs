//! Word tokenization shared by scoring and keyword extraction.

use std::sync::LazyLock;

use regex::Regex;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").expect("valid regex"));

/// Splits `text` into lowercase word tokens.
///
/// Apostrophes split words, so `"don't"` yields `"don"` and `"t"`.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    WORD_RE.find_iter(text).map(|m| m.as_str().to_lowercase())
}
